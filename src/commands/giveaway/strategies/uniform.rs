use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serenity::model::id::UserId;

use crate::commands::giveaway::strategies::base::{DrawOptions, DrawStrategy};

// Uniform sample without replacement of `min(count, participants.len())`
// items, in random order. The pool is sorted first, so the same seed always
// gives the same draw regardless of the set's iteration order.
pub fn sample_winners<T, R>(participants: &HashSet<T>, count: usize, rng: &mut R) -> Vec<T>
where
    T: Ord + Clone,
    R: Rng + ?Sized,
{
    let mut pool = participants.iter().cloned().collect::<Vec<T>>();
    pool.sort();

    let amount = count.min(pool.len());
    let (picked, _) = pool.partial_shuffle(rng, amount);
    picked.to_vec()
}

#[derive(Debug, Default)]
pub struct UniformDrawStrategy;

impl UniformDrawStrategy {
    pub fn new() -> Self {
        UniformDrawStrategy {}
    }
}

impl DrawStrategy for UniformDrawStrategy {
    fn draw(&self, options: &DrawOptions, rng: &mut dyn RngCore) -> Vec<UserId> {
        sample_winners(options.participants(), options.winner_count(), rng)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serenity::model::id::UserId;

    use crate::commands::giveaway::strategies::{
        DrawOptions, DrawStrategy, UniformDrawStrategy, sample_winners,
    };

    fn get_users(count: u64) -> HashSet<UserId> {
        (1..=count).map(UserId::new).collect()
    }

    #[test]
    fn test_sample_size_is_capped_by_participants() {
        let mut rng = StdRng::seed_from_u64(1);
        let participants = get_users(5);

        for count in 0..10 {
            let winners = sample_winners(&participants, count, &mut rng);
            assert_eq!(winners.len(), count.min(5));

            let unique = winners.iter().collect::<HashSet<&UserId>>();
            assert_eq!(unique.len(), winners.len());
            assert_eq!(winners.iter().all(|user| participants.contains(user)), true);
        }
    }

    #[test]
    fn test_sample_from_empty_set() {
        let mut rng = StdRng::seed_from_u64(1);
        let participants: HashSet<UserId> = HashSet::new();

        assert_eq!(sample_winners(&participants, 3, &mut rng).is_empty(), true);
    }

    #[test]
    fn test_same_seed_gives_same_draw() {
        let participants = get_users(20);

        let first = sample_winners(&participants, 4, &mut StdRng::seed_from_u64(42));
        let second = sample_winners(&participants, 4, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_participant_can_win() {
        let mut rng = StdRng::seed_from_u64(7);
        let participants = get_users(3);
        let mut wins: HashMap<UserId, usize> = HashMap::new();

        for _ in 0..3000 {
            let winners = sample_winners(&participants, 1, &mut rng);
            *wins.entry(winners[0]).or_insert(0) += 1;
        }

        assert_eq!(wins.len(), 3);
        assert_eq!(wins.values().all(|count| *count > 800), true);
    }

    #[test]
    fn test_winner_order_is_random() {
        let mut rng = StdRng::seed_from_u64(3);
        let participants = get_users(2);
        let mut orders: HashSet<Vec<UserId>> = HashSet::new();

        for _ in 0..100 {
            orders.insert(sample_winners(&participants, 2, &mut rng));
        }

        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn test_uniform_strategy_draws_requested_amount() {
        let mut rng = StdRng::seed_from_u64(11);
        let participants = get_users(10);
        let options = DrawOptions::new(&participants, 3);

        let strategy = UniformDrawStrategy::new();
        let winners = strategy.draw(&options, &mut rng);
        assert_eq!(winners.len(), 3);
        assert_eq!(winners.iter().all(|user| participants.contains(user)), true);
    }
}
