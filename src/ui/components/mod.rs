mod input;
mod search_input;

pub use input::{InputResult, TextInput};
pub use search_input::{SearchEvent, SearchInput};

/// Result of offering a key event to a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<E> {
  /// Key was consumed with nothing for the parent to do
  Handled,
  /// Key was not for this component
  NotHandled,
  /// Key produced an event the parent needs to handle
  Event(E),
}
