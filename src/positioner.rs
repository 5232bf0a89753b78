use super::*;

use async_trait::async_trait;

/// Where a freshly rendered message goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Placement {
    /// Always a new message at the bottom of the channel.
    Journal,
    /// A reply to the newest message when that message is itself a reply,
    /// otherwise a new message.
    Task,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct LatestMessage {
    pub(super) id: MessageId,
    pub(super) is_reply: bool,
}

/// Result of deleting a previously rendered message. `AlreadyGone` and
/// `Failed` are both swallowed by callers; they are kept apart for logging.
#[derive(Debug)]
pub(super) enum RetireOutcome {
    Deleted,
    AlreadyGone,
    Failed(anyhow::Error),
}

/// The message operations the positioner needs from one channel.
#[async_trait]
pub(super) trait ChannelApi: Send + Sync {
    async fn delete_message(&self, message_id: MessageId) -> RetireOutcome;
    async fn latest_message(&self) -> Result<Option<LatestMessage>>;
    async fn send(&self, embed: &Embed) -> Result<MessageId>;
    async fn reply(&self, to: MessageId, embed: &Embed) -> Result<MessageId>;
}

pub(super) async fn retire<C: ChannelApi + ?Sized>(channel: &C, message_id: MessageId) -> RetireOutcome {
    let outcome = channel.delete_message(message_id).await;
    match &outcome {
        RetireOutcome::Deleted => {}
        RetireOutcome::AlreadyGone => {
            debug!("message {} already gone", message_id);
        }
        RetireOutcome::Failed(err) => {
            warn!("delete message {} failed: {:#}", message_id, err);
        }
    }
    outcome
}

/// Replaces `prior` with `embed` and returns the new message id.
///
/// Always produces a message: anything that goes wrong past the tolerated
/// delete ends in a plain send.
pub(super) async fn place<C: ChannelApi + ?Sized>(
    channel: &C,
    prior: Option<MessageId>,
    embed: &Embed,
    placement: Placement,
) -> Result<MessageId> {
    match try_place(channel, prior, embed, placement).await {
        Ok(message_id) => Ok(message_id),
        Err(err) => {
            warn!("placing {:?} message failed, sending plain: {:#}", placement, err);
            channel.send(embed).await.context("send fallback message")
        }
    }
}

async fn try_place<C: ChannelApi + ?Sized>(
    channel: &C,
    prior: Option<MessageId>,
    embed: &Embed,
    placement: Placement,
) -> Result<MessageId> {
    if let Some(prior) = prior {
        retire(channel, prior).await;
    }

    match placement {
        Placement::Journal => channel.send(embed).await,
        Placement::Task => match channel.latest_message().await? {
            Some(latest) if latest.is_reply => match channel.reply(latest.id, embed).await {
                Ok(message_id) => Ok(message_id),
                Err(err) => {
                    warn!("reply to {} failed, sending plain: {:#}", latest.id, err);
                    channel.send(embed).await
                }
            },
            _ => channel.send(embed).await,
        },
    }
}
