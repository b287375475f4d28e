//! Interactive connection session turning pointer gestures into graph edges

use super::hit_test::HitTarget;
use crate::nodes::{EdgeId, GraphError, NodeGraph, SocketRef};
use egui::Pos2;
use log::debug;

/// Default drag threshold in device-independent pixels
pub const DRAG_THRESHOLD: f32 = 10.0;

/// Fixed origin the view recenters on after a double-click
pub const VIEW_ORIGIN: Pos2 = Pos2::ZERO;

/// Interaction state of a connection session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    PendingConnection,
}

/// Observable result of a pointer event.
///
/// Legality failures never mutate the graph; the outcome reports the reason
/// so callers and tests can observe it, but the session itself treats every
/// failure as a silent return to idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    /// The event had no effect on the session
    Ignored,
    /// Press on empty canvas while idle begins a pan, never a connection
    PanStarted,
    /// A start socket was grabbed; the session awaits the other endpoint
    ConnectPending,
    /// A new edge was created
    Connected(EdgeId),
    /// The candidate pair was rejected; the graph is unchanged
    Rejected(GraphError),
    /// The pending gesture was resolved without a connection
    Cancelled,
    /// The view should recenter on the given origin
    Recenter(Pos2),
}

/// State machine resolving press/release/double-click events into graph
/// mutations.
///
/// One session is long-lived per editor view and passed explicitly, so
/// multiple editors can run independently. It cycles between
/// [`SessionState::Idle`] and [`SessionState::PendingConnection`]; a pending
/// gesture is only ever resolved by a later event, never by timeout.
#[derive(Debug, Clone)]
pub struct ConnectionSession {
    state: SessionState,
    start_socket: Option<SocketRef>,
    press_position: Option<Pos2>,
    drag_threshold: f32,
}

impl ConnectionSession {
    /// Creates an idle session with the default drag threshold
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            start_socket: None,
            press_position: None,
            drag_threshold: DRAG_THRESHOLD,
        }
    }

    /// Overrides the drag threshold
    pub fn with_drag_threshold(mut self, threshold: f32) -> Self {
        self.drag_threshold = threshold;
        self
    }

    /// Current interaction state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The start socket of a pending connection, if any
    pub fn pending_start(&self) -> Option<SocketRef> {
        self.start_socket
    }

    /// Handles a pointer press.
    ///
    /// While idle, a press on a socket starts a pending connection and a
    /// press anywhere else begins a canvas pan; the two are mutually
    /// exclusive outcomes of the same event, disambiguated solely by the
    /// hit-test result. The presentation layer additionally deselects all
    /// other entities on press, which is outside this session's state.
    ///
    /// While a connection is pending, a second press always resolves the
    /// gesture: on a socket it attempts the connection (two-click connect),
    /// anywhere else it cancels.
    pub fn on_press(
        &mut self,
        graph: &mut NodeGraph,
        position: Pos2,
        hit: Option<HitTarget>,
    ) -> GestureOutcome {
        match self.state {
            SessionState::Idle => match hit.and_then(|target| target.socket()) {
                Some(socket) => {
                    self.state = SessionState::PendingConnection;
                    self.start_socket = Some(socket);
                    self.press_position = Some(position);
                    debug!("connection pending from {}", socket);
                    GestureOutcome::ConnectPending
                }
                None => GestureOutcome::PanStarted,
            },
            SessionState::PendingConnection => match hit.and_then(|target| target.socket()) {
                Some(socket) => self.finish_connect(graph, socket),
                None => self.cancel(),
            },
        }
    }

    /// Handles a pointer release.
    ///
    /// A release farther than the drag threshold from the recorded press
    /// position ends the drag: a socket under the pointer completes the
    /// connection attempt, anything else cancels. A release within the
    /// threshold leaves the gesture pending, so a quick click on a socket
    /// can be paired with a later click on the other endpoint.
    pub fn on_release(
        &mut self,
        graph: &mut NodeGraph,
        position: Pos2,
        hit: Option<HitTarget>,
    ) -> GestureOutcome {
        if self.state != SessionState::PendingConnection {
            return GestureOutcome::Ignored;
        }
        let Some(press_position) = self.press_position else {
            return GestureOutcome::Ignored;
        };
        // Squared distances avoid the square root
        let moved = (position - press_position).length_sq()
            >= self.drag_threshold * self.drag_threshold;
        if !moved {
            return GestureOutcome::Ignored;
        }
        match hit.and_then(|target| target.socket()) {
            Some(socket) => self.finish_connect(graph, socket),
            None => self.cancel(),
        }
    }

    /// Handles a double-click: recenters the view on a fixed origin.
    ///
    /// An independent camera action sharing the input channel; connection
    /// state is never affected.
    pub fn on_double_click(&mut self) -> GestureOutcome {
        GestureOutcome::Recenter(VIEW_ORIGIN)
    }

    /// Validates the candidate pair and mutates the graph on success.
    ///
    /// Direction is deliberately not normalized here: the first-clicked
    /// socket is forwarded as the start whatever its direction, and
    /// `add_edge` rejects anything that is not OUTPUT to INPUT. A gesture
    /// begun on an input and ended on an output therefore fails post-hoc.
    fn finish_connect(&mut self, graph: &mut NodeGraph, end: SocketRef) -> GestureOutcome {
        self.state = SessionState::Idle;
        self.press_position = None;
        let Some(start) = self.start_socket.take() else {
            return GestureOutcome::Ignored;
        };

        if start == end {
            return GestureOutcome::Rejected(GraphError::SelfConnection);
        }
        if graph.connected(start, end) {
            return GestureOutcome::Rejected(GraphError::DuplicateConnection);
        }

        // A pipeline input has at most one producer: replace an existing
        // feeding edge, but only once the new pair is known to be valid so
        // a failed attempt leaves the graph untouched.
        if start.is_output()
            && end.is_input()
            && graph.socket(start).is_some()
            && graph.socket(end).is_some()
        {
            if let Some(existing) = graph.producer_of(end) {
                debug!("replacing producer edge {} on {}", existing, end);
                if let Err(error) = graph.remove_edge(existing) {
                    return GestureOutcome::Rejected(error);
                }
            }
        }

        match graph.add_edge(start, end) {
            Ok(edge_id) => GestureOutcome::Connected(edge_id),
            Err(error) => {
                debug!("connection from {} to {} rejected: {}", start, end, error);
                GestureOutcome::Rejected(error)
            }
        }
    }

    fn cancel(&mut self) -> GestureOutcome {
        self.state = SessionState::Idle;
        self.start_socket = None;
        self.press_position = None;
        GestureOutcome::Cancelled
    }
}

impl Default for ConnectionSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{Node, NodeId};
    use egui::Vec2;

    fn two_node_graph() -> (NodeGraph, NodeId, NodeId) {
        let mut graph = NodeGraph::new();
        let mut producer = Node::new(0, "Producer", Pos2::ZERO);
        producer.add_output();
        let mut consumer = Node::new(0, "Consumer", Pos2::new(300.0, 0.0));
        consumer.add_input();
        let a = graph.add_node(producer);
        let b = graph.add_node(consumer);
        (graph, a, b)
    }

    fn socket_hit(socket: SocketRef) -> Option<HitTarget> {
        Some(HitTarget::Socket(socket))
    }

    #[test]
    fn press_on_socket_starts_a_pending_connection() {
        let (mut graph, a, _) = two_node_graph();
        let mut session = ConnectionSession::new();
        let start = SocketRef::output(a, 0);

        let outcome = session.on_press(&mut graph, Pos2::new(5.0, 5.0), socket_hit(start));
        assert_eq!(outcome, GestureOutcome::ConnectPending);
        assert_eq!(session.state(), SessionState::PendingConnection);
        assert_eq!(session.pending_start(), Some(start));
    }

    #[test]
    fn press_on_empty_canvas_pans_instead() {
        let (mut graph, _, _) = two_node_graph();
        let mut session = ConnectionSession::new();

        let outcome = session.on_press(&mut graph, Pos2::new(5.0, 5.0), None);
        assert_eq!(outcome, GestureOutcome::PanStarted);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn drag_above_threshold_connects_on_release() {
        let (mut graph, a, b) = two_node_graph();
        let mut session = ConnectionSession::new();
        let start = SocketRef::output(a, 0);
        let end = SocketRef::input(b, 0);

        let press = Pos2::new(0.0, 0.0);
        session.on_press(&mut graph, press, socket_hit(start));
        // 50 px of travel, well beyond the 10 px threshold
        let outcome = session.on_release(&mut graph, press + Vec2::new(50.0, 0.0), socket_hit(end));

        assert!(matches!(outcome, GestureOutcome::Connected(_)));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(graph.connected(start, end));
    }

    #[test]
    fn release_below_threshold_keeps_the_gesture_pending() {
        let (mut graph, a, _) = two_node_graph();
        let mut session = ConnectionSession::new();
        let start = SocketRef::output(a, 0);

        let press = Pos2::new(0.0, 0.0);
        session.on_press(&mut graph, press, socket_hit(start));
        // 3 px away over empty canvas: a click, not a drag
        let outcome = session.on_release(&mut graph, press + Vec2::new(3.0, 0.0), None);

        assert_eq!(outcome, GestureOutcome::Ignored);
        assert_eq!(session.state(), SessionState::PendingConnection);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn release_exactly_at_threshold_counts_as_a_drag() {
        let (mut graph, a, _) = two_node_graph();
        let mut session = ConnectionSession::new();
        let press = Pos2::new(0.0, 0.0);
        session.on_press(&mut graph, press, socket_hit(SocketRef::output(a, 0)));

        let outcome =
            session.on_release(&mut graph, press + Vec2::new(DRAG_THRESHOLD, 0.0), None);
        assert_eq!(outcome, GestureOutcome::Cancelled);
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn two_clicks_connect_like_a_drag() {
        let (mut graph, a, b) = two_node_graph();
        let mut session = ConnectionSession::new();
        let start = SocketRef::output(a, 0);
        let end = SocketRef::input(b, 0);

        let press = Pos2::new(0.0, 0.0);
        session.on_press(&mut graph, press, socket_hit(start));
        session.on_release(&mut graph, press + Vec2::new(2.0, 2.0), socket_hit(start));
        let outcome = session.on_press(&mut graph, Pos2::new(300.0, 0.0), socket_hit(end));

        assert!(matches!(outcome, GestureOutcome::Connected(_)));
        assert!(graph.connected(start, end));
    }

    #[test]
    fn second_press_on_empty_canvas_cancels() {
        let (mut graph, a, _) = two_node_graph();
        let mut session = ConnectionSession::new();
        session.on_press(&mut graph, Pos2::ZERO, socket_hit(SocketRef::output(a, 0)));

        let outcome = session.on_press(&mut graph, Pos2::new(40.0, 40.0), None);
        assert_eq!(outcome, GestureOutcome::Cancelled);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.pending_start(), None);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn connecting_a_socket_to_itself_is_rejected() {
        let (mut graph, a, _) = two_node_graph();
        let mut session = ConnectionSession::new();
        let start = SocketRef::output(a, 0);

        session.on_press(&mut graph, Pos2::ZERO, socket_hit(start));
        let outcome = session.on_press(&mut graph, Pos2::ZERO, socket_hit(start));
        assert_eq!(outcome, GestureOutcome::Rejected(GraphError::SelfConnection));
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn backwards_gesture_fails_post_hoc_without_mutation() {
        let (mut graph, a, b) = two_node_graph();
        let mut session = ConnectionSession::new();
        // Grab the input first, end on the output: no normalization
        session.on_press(&mut graph, Pos2::ZERO, socket_hit(SocketRef::input(b, 0)));
        let outcome = session.on_release(
            &mut graph,
            Pos2::new(50.0, 0.0),
            socket_hit(SocketRef::output(a, 0)),
        );

        assert_eq!(outcome, GestureOutcome::Rejected(GraphError::InvalidDirection));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn duplicate_pair_is_rejected_without_a_second_edge() {
        let (mut graph, a, b) = two_node_graph();
        let mut session = ConnectionSession::new();
        let start = SocketRef::output(a, 0);
        let end = SocketRef::input(b, 0);
        graph.add_edge(start, end).unwrap();

        session.on_press(&mut graph, Pos2::ZERO, socket_hit(start));
        let outcome = session.on_press(&mut graph, Pos2::new(300.0, 0.0), socket_hit(end));

        assert_eq!(
            outcome,
            GestureOutcome::Rejected(GraphError::DuplicateConnection)
        );
        assert_eq!(graph.edges.len(), 1);
    }

    #[test]
    fn a_new_producer_replaces_the_existing_one() {
        let mut graph = NodeGraph::new();
        let mut first = Node::new(0, "First", Pos2::ZERO);
        first.add_output();
        let mut second = Node::new(0, "Second", Pos2::ZERO);
        second.add_output();
        let mut sink = Node::new(0, "Sink", Pos2::ZERO);
        sink.add_input();
        let first = graph.add_node(first);
        let second = graph.add_node(second);
        let sink = graph.add_node(sink);
        let end = SocketRef::input(sink, 0);

        let old_edge = graph.add_edge(SocketRef::output(first, 0), end).unwrap();

        let mut session = ConnectionSession::new();
        session.on_press(&mut graph, Pos2::ZERO, socket_hit(SocketRef::output(second, 0)));
        let outcome = session.on_press(&mut graph, Pos2::new(10.0, 0.0), socket_hit(end));

        let GestureOutcome::Connected(new_edge) = outcome else {
            panic!("expected a connection, got {:?}", outcome);
        };
        assert_ne!(new_edge, old_edge);
        assert_eq!(graph.edges.len(), 1);
        assert!(graph.connected(SocketRef::output(second, 0), end));
        assert!(!graph.connected(SocketRef::output(first, 0), end));
    }

    #[test]
    fn double_click_recenters_without_touching_connection_state() {
        let (mut graph, a, _) = two_node_graph();
        let mut session = ConnectionSession::new();
        session.on_press(&mut graph, Pos2::ZERO, socket_hit(SocketRef::output(a, 0)));

        assert_eq!(
            session.on_double_click(),
            GestureOutcome::Recenter(VIEW_ORIGIN)
        );
        assert_eq!(session.state(), SessionState::PendingConnection);
    }

    #[test]
    fn release_while_idle_is_ignored() {
        let (mut graph, _, _) = two_node_graph();
        let mut session = ConnectionSession::new();
        assert_eq!(
            session.on_release(&mut graph, Pos2::new(100.0, 100.0), None),
            GestureOutcome::Ignored
        );
    }
}
