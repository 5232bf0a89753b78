use super::*;

#[derive(Clone, Debug, PartialEq)]
pub(super) enum OptionValue {
    String(String),
    Integer(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub(super) enum BotCommand {
    Help,
    Today { content: String },
    Task { content: Option<String> },
    Done { number: i64 },
}

impl BotCommand {
    /// Unknown names, and known names missing a required option, yield `None`.
    pub(super) fn parse(name: &str, options: &[(String, OptionValue)]) -> Option<Self> {
        let string_option = |key: &str| {
            options.iter().find_map(|(name, value)| match value {
                OptionValue::String(s) if name == key => Some(s.clone()),
                _ => None,
            })
        };
        let integer_option = |key: &str| {
            options.iter().find_map(|(name, value)| match value {
                OptionValue::Integer(n) if name == key => Some(*n),
                _ => None,
            })
        };

        match name {
            "help" => Some(BotCommand::Help),
            "today" => string_option("content").map(|content| BotCommand::Today { content }),
            "task" => Some(BotCommand::Task {
                content: string_option("content"),
            }),
            "done" => integer_option("number").map(|number| BotCommand::Done { number }),
            _ => None,
        }
    }

    pub(super) fn name(&self) -> &'static str {
        match self {
            BotCommand::Help => "help",
            BotCommand::Today { .. } => "today",
            BotCommand::Task { .. } => "task",
            BotCommand::Done { .. } => "done",
        }
    }
}

/// What the invoker sees in response to their own interaction.
#[derive(Debug, PartialEq)]
pub(super) enum Reply {
    /// Shown only to the invoker.
    Private(Embed),
    /// Acknowledged with nothing visible; the channel message is the answer.
    Silent,
}

/// The platform's per-interaction acknowledgement.
#[async_trait::async_trait]
pub(super) trait Acknowledge: Send + Sync {
    /// Acknowledge without showing anything to the invoker.
    async fn acknowledge(&self) -> Result<()>;
    /// Withdraw the invisible acknowledgement.
    async fn retract(&self) -> Result<()>;
}

/// Runs `command` wrapped in the invisible acknowledgement. Acknowledgement
/// failures are logged and never keep the command from being applied.
pub(super) async fn dispatch_acknowledged<A, C>(
    ack: &A,
    store: &ChannelStore,
    channel_id: ChannelId,
    channel: &C,
    command: BotCommand,
    today: NaiveDate,
) -> Result<Reply>
where
    A: Acknowledge + ?Sized,
    C: ChannelApi + ?Sized,
{
    let silent = command != BotCommand::Help;
    if silent {
        if let Err(err) = ack.acknowledge().await {
            warn!("acknowledge /{} failed: {:#}", command.name(), err);
        }
    }

    let result = dispatch(store, channel_id, channel, command, today).await;

    if silent {
        if let Err(err) = ack.retract().await {
            warn!("retract acknowledgement failed: {:#}", err);
        }
    }
    result
}

pub(super) async fn dispatch<C: ChannelApi + ?Sized>(
    store: &ChannelStore,
    channel_id: ChannelId,
    channel: &C,
    command: BotCommand,
    today: NaiveDate,
) -> Result<Reply> {
    debug!("dispatching /{} in channel {}", command.name(), channel_id);
    match command {
        BotCommand::Help => Ok(Reply::Private(help_embed())),
        BotCommand::Today { content } => {
            handle_today(store, channel_id, channel, content, today).await?;
            Ok(Reply::Silent)
        }
        BotCommand::Task { content } => {
            handle_task(store, channel_id, channel, content.as_deref()).await?;
            Ok(Reply::Silent)
        }
        BotCommand::Done { number } => {
            handle_done(store, channel_id, channel, number).await?;
            Ok(Reply::Silent)
        }
    }
}

async fn handle_today<C: ChannelApi + ?Sized>(
    store: &ChannelStore,
    channel_id: ChannelId,
    channel: &C,
    content: String,
    today: NaiveDate,
) -> Result<()> {
    let _guard = store.lock_channel(channel_id).await;
    let date = journal_date(today);
    let journal = store.append_journal(channel_id, &date, content).await;

    let embed = journal_embed(&journal.date, &journal.entries);
    let message_id = place(channel, journal.last_message_id, &embed, Placement::Journal).await?;
    store.set_journal_message(channel_id, message_id).await;
    Ok(())
}

async fn handle_task<C: ChannelApi + ?Sized>(
    store: &ChannelStore,
    channel_id: ChannelId,
    channel: &C,
    content: Option<&str>,
) -> Result<()> {
    let _guard = store.lock_channel(channel_id).await;
    let items = content.map(split_tasks).unwrap_or_default();
    let list = store.append_tasks(channel_id, items).await;

    let embed = task_embed(&list.tasks);
    let message_id = place(channel, list.last_message_id, &embed, Placement::Task).await?;
    store.set_task_message(channel_id, message_id).await;
    Ok(())
}

async fn handle_done<C: ChannelApi + ?Sized>(
    store: &ChannelStore,
    channel_id: ChannelId,
    channel: &C,
    number: i64,
) -> Result<()> {
    let _guard = store.lock_channel(channel_id).await;
    match store.complete_task(channel_id, number).await {
        DoneOutcome::Ignored => {
            debug!("ignoring /done {} in channel {}", number, channel_id);
        }
        DoneOutcome::Remaining(list) => {
            let embed = task_embed(&list.tasks);
            let message_id =
                place(channel, list.last_message_id, &embed, Placement::Task).await?;
            store.set_task_message(channel_id, message_id).await;
        }
        DoneOutcome::Emptied(last_message_id) => {
            if let Some(message_id) = last_message_id {
                retire(channel, message_id).await;
            }
            info!("task list in channel {} completed", channel_id);
        }
    }
    Ok(())
}
