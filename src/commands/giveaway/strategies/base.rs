use std::collections::HashSet;

use rand::RngCore;
use serenity::model::id::UserId;

pub struct DrawOptions<'a> {
    participants: &'a HashSet<UserId>,
    winner_count: usize,
}

impl<'a> DrawOptions<'a> {
    pub fn new(participants: &'a HashSet<UserId>, winner_count: usize) -> Self {
        DrawOptions {
            participants,
            winner_count,
        }
    }

    // Returns everyone who entered the giveaway.
    pub fn participants(&self) -> &'a HashSet<UserId> {
        self.participants
    }

    // Returns how many winners were requested by the host.
    pub fn winner_count(&self) -> usize {
        self.winner_count
    }
}

pub trait DrawStrategy: Send + Sync {
    // Returns the winners in the order they were drawn. Never returns more
    // than `winner_count` users, and no user twice.
    fn draw(&self, options: &DrawOptions, rng: &mut dyn RngCore) -> Vec<UserId>;
}
