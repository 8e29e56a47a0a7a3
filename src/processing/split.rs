/*! splitting

Seeded train/validation/test splitting of parallel data.

Sizes are computed the same way for every language:
`n_holdout = ceil(n * (val + test))`, then `n_test = ceil(n_holdout * test / (val + test))`.
!*/
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::SplitRatios;
use crate::error::Error;

#[derive(Debug, PartialEq, Eq)]
pub struct Splits<T> {
    pub train: Vec<T>,
    pub val: Vec<T>,
    pub test: Vec<T>,
}

impl<T> Splits<T> {
    /// Iterate over `(name, records)`, names being `train`, `val` and `test`.
    pub fn into_named(self) -> [(&'static str, Vec<T>); 3] {
        [("train", self.train), ("val", self.val), ("test", self.test)]
    }
}

fn check_ratios(ratios: &SplitRatios) -> Result<f64, Error> {
    let holdout = ratios.val_ratio + ratios.test_ratio;
    let valid = |r: f64| (0.0..1.0).contains(&r);
    if !valid(ratios.val_ratio) || !valid(ratios.test_ratio) || !(holdout > 0.0 && holdout < 1.0)
    {
        return Err(Error::Custom(format!(
            "invalid split ratios: val={} test={}",
            ratios.val_ratio, ratios.test_ratio
        )));
    }
    Ok(holdout)
}

/// Shuffle `items` with `seed` and cut them in three.
pub fn split<T>(mut items: Vec<T>, ratios: &SplitRatios, seed: u64) -> Result<Splits<T>, Error> {
    let holdout = check_ratios(ratios)?;

    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let n = items.len();
    let n_holdout = ((n as f64) * holdout).ceil() as usize;
    let n_test = ((n_holdout as f64) * ratios.test_ratio / holdout).ceil() as usize;
    let n_test = n_test.min(n_holdout);

    let mut holdout_items = items.split_off(n - n_holdout.min(n));
    let test = holdout_items.split_off(holdout_items.len() - n_test.min(holdout_items.len()));

    Ok(Splits {
        train: items,
        val: holdout_items,
        test,
    })
}

/// Truncate every item list to the length of the shortest one.
pub fn equalize<T>(lists: &mut [Vec<T>]) {
    if let Some(min) = lists.iter().map(Vec::len).min() {
        for list in lists.iter_mut() {
            list.truncate(min);
        }
    }
}
