/// Outcome of offering a key event to a component.
///
/// Components return this so the app can chain handlers: the first
/// component that does not answer `NotHandled` wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, nothing for the parent to do
  Handled,
  /// Key was consumed and produced an event for the parent
  Event(T),
  /// Key was not consumed, try the next handler
  NotHandled,
}
