/// Errors raised while parsing marble diagrams.
#[derive(Debug, Clone, Copy, thiserror::Error, PartialEq, Eq)]
pub enum MarbleError {
  /// A group was opened inside another group.
  #[error("nested group start '(' in marble diagram")]
  UnexpectedGroupStart,
  /// A group was closed without being opened.
  #[error("group end ')' without matching '('")]
  UnexpectedGroupEnd,
  /// The diagram ended inside a group.
  #[error("marble diagram ends inside a group")]
  UnclosedGroup,
  /// A value marker has no value.
  #[error("no value for marker '{0}'")]
  UnresolvedValue(char),
  /// A character that is not allowed in this kind of diagram.
  #[error("unexpected character '{0}' in marble diagram")]
  UnexpectedCharacter(char),
  /// A second subscription point `^`.
  #[error("found a second subscription point '^'")]
  DuplicateSubscription,
  /// A second unsubscription point `!`.
  #[error("found a second unsubscription point '!'")]
  DuplicateUnsubscription,
  /// A subscription diagram without `^`.
  #[error("subscription marble diagram has no subscription point '^'")]
  MissingSubscription,
}
