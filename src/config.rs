use std::env;

use serenity::model::id::RoleId;

use crate::error::{Error, Result};

pub const DEFAULT_GIVEAWAY_CHANNEL: &str = "🎰｜giveaways";

#[readonly::make]
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub discord_token: String,
    // Members with any of these roles may run the giveaway commands.
    pub admin_role: Option<RoleId>,
    pub staff_role: Option<RoleId>,
    // Every entrant must hold this role, on top of a per-giveaway requirement.
    pub verify_role: Option<RoleId>,
    pub giveaway_channel: String,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| Error::Config("Expected a DISCORD_TOKEN in the environment".to_string()))?;

        Ok(BotConfig {
            discord_token,
            admin_role: parse_role(&lookup, "GIVEAWAY_ADMIN_ROLE_ID")?,
            staff_role: parse_role(&lookup, "GIVEAWAY_STAFF_ROLE_ID")?,
            verify_role: parse_role(&lookup, "GIVEAWAY_VERIFY_ROLE_ID")?,
            giveaway_channel: lookup("GIVEAWAY_CHANNEL_NAME")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_GIVEAWAY_CHANNEL.to_string()),
        })
    }

    // Roles which are allowed to manage giveaways.
    pub fn staff_roles(&self) -> impl Iterator<Item = RoleId> + '_ {
        self.admin_role.iter().chain(self.staff_role.iter()).copied()
    }
}

fn parse_role<F>(lookup: &F, key: &str) -> Result<Option<RoleId>>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match lookup(key) {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Ok(None),
    };

    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(Some(RoleId::new(id))),
        _ => Err(Error::Config(format!(
            "{} must be a Discord role id, got `{}`.",
            key, raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serenity::model::id::RoleId;

    use crate::config::{BotConfig, DEFAULT_GIVEAWAY_CHANNEL};
    use crate::error::Error;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<String, String>>();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn test_read_minimal_config() {
        let config = BotConfig::from_lookup(lookup_from(&[("DISCORD_TOKEN", "token")])).unwrap();

        assert_eq!(config.discord_token, "token");
        assert_eq!(config.admin_role, None);
        assert_eq!(config.verify_role, None);
        assert_eq!(config.giveaway_channel, DEFAULT_GIVEAWAY_CHANNEL);
        assert_eq!(config.staff_roles().count(), 0);
    }

    #[test]
    fn test_read_role_ids() {
        let config = BotConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "token"),
            ("GIVEAWAY_ADMIN_ROLE_ID", "10"),
            ("GIVEAWAY_STAFF_ROLE_ID", " 20 "),
            ("GIVEAWAY_VERIFY_ROLE_ID", "30"),
            ("GIVEAWAY_CHANNEL_NAME", "prizes"),
        ]))
        .unwrap();

        assert_eq!(
            config.staff_roles().collect::<Vec<RoleId>>(),
            vec![RoleId::new(10), RoleId::new(20)]
        );
        assert_eq!(config.verify_role, Some(RoleId::new(30)));
        assert_eq!(config.giveaway_channel, "prizes");
    }

    #[test]
    fn test_get_error_for_missing_token() {
        let result = BotConfig::from_lookup(lookup_from(&[]));

        assert_eq!(
            result.unwrap_err(),
            Error::Config("Expected a DISCORD_TOKEN in the environment".to_string())
        );
    }

    #[test]
    fn test_get_error_for_invalid_role_id() {
        let result = BotConfig::from_lookup(lookup_from(&[
            ("DISCORD_TOKEN", "token"),
            ("GIVEAWAY_ADMIN_ROLE_ID", "0"),
        ]));

        assert_eq!(
            result.unwrap_err(),
            Error::Config("GIVEAWAY_ADMIN_ROLE_ID must be a Discord role id, got `0`.".to_string())
        );
    }
}
