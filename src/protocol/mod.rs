//! Request and response messages.
//!
//! The optimizer's whole external boundary: a [`RouteRequestMessage`] goes
//! in, a [`RouteResponse`] comes out, both as camelCase JSON.
//!
//! ```
//! use u_itinerary::protocol::{RouteRequestMessage, SelectionMode};
//!
//! let request = RouteRequestMessage::from_json(r#"{
//!     "correlationId": "req-1",
//!     "nodes": [
//!         {"id": 1, "name": "A", "position": {"x": 0, "y": 0, "z": 0}},
//!         {"id": 2, "name": "B", "position": {"x": 5, "y": 0, "z": 0}}
//!     ],
//!     "freeEdges": [],
//!     "selection": {"mode": "point-to-point", "start": 1, "end": 2},
//!     "config": {"mode": "baseline-only"}
//! }"#).unwrap();
//! assert_eq!(request.selection.mode, SelectionMode::PointToPoint);
//! ```

mod request;
mod response;
mod selection;

pub use request::{PositionUnits, RouteRequestMessage};
pub use response::RouteResponse;
pub use selection::{ResolvedSelection, Selection, SelectionMode};
