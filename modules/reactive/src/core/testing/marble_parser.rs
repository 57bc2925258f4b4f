//! Marble diagram grammar.
//!
//! `-` and ` ` advance one frame, `(`..`)` put every signal inside on the frame of the `(`, `|`
//! completes, `#` fails, `^` marks the subscription point and `!` the unsubscription point. Every
//! other character is a value marker.

use alloc::vec::Vec;

use super::{MarbleError, Recorded, Signal, TestSchedulerConfig};


/// Parses a signal diagram.
///
/// With `allow_subscription_point`, frames are relative to the `^` marker and signals before it are
/// dropped since no subscriber can observe them.
pub(super) fn parse_signals<T, R>(
  marbles: &str,
  resolve: R,
  config: &TestSchedulerConfig,
  allow_subscription_point: bool,
) -> Result<Vec<Recorded<T>>, MarbleError>
where
  R: Fn(char) -> Option<T>, {
  let factor = frame_factor(config);
  let mut subscription_index = None;
  for (index, marker) in marbles.chars().enumerate() {
    if marker == '^' {
      if !allow_subscription_point {
        return Err(MarbleError::UnexpectedCharacter('^'));
      }
      if subscription_index.replace(index).is_some() {
        return Err(MarbleError::DuplicateSubscription);
      }
    }
  }
  let offset = subscription_index.map_or(0, |index| index as i64 * factor);

  let mut signals = Vec::new();
  let mut frame = -offset;
  let mut group_start: Option<i64> = None;
  for marker in marbles.chars() {
    let signal = match marker {
      | ' ' | '-' | '^' => None,
      | '(' => {
        if group_start.replace(frame).is_some() {
          return Err(MarbleError::UnexpectedGroupStart);
        }
        None
      },
      | ')' => {
        if group_start.take().is_none() {
          return Err(MarbleError::UnexpectedGroupEnd);
        }
        None
      },
      | '|' => Some(Signal::Complete),
      | '#' => Some(Signal::Error(config.error_value().clone())),
      | '!' => return Err(MarbleError::UnexpectedCharacter('!')),
      | value => Some(Signal::Next(resolve(value).ok_or(MarbleError::UnresolvedValue(value))?)),
    };
    if let Some(signal) = signal {
      let at = group_start.unwrap_or(frame);
      if at >= 0 {
        signals.push(Recorded::new(at as u64, signal));
      }
    }
    frame += factor;
  }
  if group_start.is_some() {
    return Err(MarbleError::UnclosedGroup);
  }
  Ok(signals)
}

/// Parses a subscription diagram into its `^` and `!` frames.
pub(super) fn parse_subscription_frames(
  marbles: &str,
  config: &TestSchedulerConfig,
) -> Result<(Option<u64>, Option<u64>), MarbleError> {
  let factor = frame_factor(config) as u64;
  let mut frame = 0_u64;
  let mut group_start: Option<u64> = None;
  let mut subscribed = None;
  let mut unsubscribed = None;
  for marker in marbles.chars() {
    match marker {
      | ' ' | '-' => {},
      | '(' => {
        if group_start.replace(frame).is_some() {
          return Err(MarbleError::UnexpectedGroupStart);
        }
      },
      | ')' => {
        if group_start.take().is_none() {
          return Err(MarbleError::UnexpectedGroupEnd);
        }
      },
      | '^' => {
        if subscribed.replace(group_start.unwrap_or(frame)).is_some() {
          return Err(MarbleError::DuplicateSubscription);
        }
      },
      | '!' => {
        if unsubscribed.replace(group_start.unwrap_or(frame)).is_some() {
          return Err(MarbleError::DuplicateUnsubscription);
        }
      },
      | other => return Err(MarbleError::UnexpectedCharacter(other)),
    }
    frame += factor;
  }
  if group_start.is_some() {
    return Err(MarbleError::UnclosedGroup);
  }
  Ok((subscribed, unsubscribed))
}

fn frame_factor(config: &TestSchedulerConfig) -> i64 {
  i64::try_from(config.frame_time_factor()).unwrap_or(i64::MAX)
}
