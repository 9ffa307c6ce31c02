//! Aggregate reducers for the seat plan designer.
//!
//! - Editor: grid editing with bounded undo
//! - Session: editor plus schedule, keeps seat maps in line with the layout

pub mod editor;
pub mod session;

pub use editor::{EditorAction, EditorReducer, EditorState, HISTORY_LIMIT};
pub use session::{SessionAction, SessionEnvironment, VenueSessionReducer, VenueSessionState};
