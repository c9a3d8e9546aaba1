use serenity::model::guild::Member;
use serenity::model::id::{RoleId, UserId};
use serenity::model::permissions::Permissions;

use crate::config::BotConfig;

// Answers role questions about a user. Giveaway entry and command access
// are both decided through it.
pub trait Eligibility {
    fn has_role(&self, user_id: UserId, role_id: RoleId) -> bool;
}

impl Eligibility for Member {
    fn has_role(&self, user_id: UserId, role_id: RoleId) -> bool {
        self.user.id == user_id && self.roles.contains(&role_id)
    }
}

// Staff are members with one of the configured management roles. Guild
// administrators are always allowed.
pub fn is_staff(member: &Member, config: &BotConfig) -> bool {
    let is_administrator = member
        .permissions
        .map(|permissions| permissions.contains(Permissions::ADMINISTRATOR))
        .unwrap_or(false);

    is_administrator || has_any_role(member, member.user.id, config.staff_roles())
}

pub fn has_any_role<I>(eligibility: &dyn Eligibility, user_id: UserId, roles: I) -> bool
where
    I: IntoIterator<Item = RoleId>,
{
    roles
        .into_iter()
        .any(|role_id| eligibility.has_role(user_id, role_id))
}
