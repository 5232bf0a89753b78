use super::*;

pub(super) fn load_config(path: Option<&Path>, env_token: Option<String>) -> Result<Config> {
    let config_file = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            toml::from_str::<ConfigFile>(&contents).context("parse config")?
        }
        None => ConfigFile::default(),
    };

    let token = env_token
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| {
            config_file
                .token
                .map(|token| token.trim().to_string())
                .filter(|token| !token.is_empty())
        })
        .ok_or_else(|| anyhow!("bot token missing: set {} or `token` in the config", TOKEN_ENV))?;

    if let Some(offset) = config_file.utc_offset_minutes {
        if fixed_offset(offset).is_none() {
            return Err(anyhow!("utc_offset_minutes out of range: {}", offset));
        }
    }

    Ok(Config {
        token,
        guild_id: config_file.guild_id,
        utc_offset_minutes: config_file.utc_offset_minutes,
    })
}

pub(super) fn fixed_offset(minutes: i32) -> Option<FixedOffset> {
    minutes.checked_mul(60).and_then(FixedOffset::east_opt)
}

/// Today's calendar date in the configured offset, or in local time.
pub(super) fn current_date(config: &Config) -> NaiveDate {
    date_at(config, Utc::now())
}

pub(super) fn date_at(config: &Config, now: DateTime<Utc>) -> NaiveDate {
    match config.utc_offset_minutes.and_then(fixed_offset) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.with_timezone(&Local).date_naive(),
    }
}

/// "January 5, 2024"
pub(super) fn journal_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub(super) fn split_tasks(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string)
        .collect()
}
