use std::collections::hash_map::DefaultHasher;
use std::env;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock};

use rand::prelude::*;

use rand_xorshift::XorShiftRng;

/// Provides a set of patterns useful for testing and benchmarking sorting
/// algorithms. Currently limited to i32 values.

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    random_vec(len)
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<rand::distributions::Uniform<i32>> + Hash,
{
    // :.:.:.::

    let mut rng: XorShiftRng = rand::SeedableRng::seed_from_u64(keyed_seed(len, &range));

    // Abstracting over ranges in Rust :(
    let dist: rand::distributions::Uniform<i32> = range.into();
    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    //  ^      ^
    //  |      |
    // sorted  |
    //     unsorted

    // Simulate a pre-existing sorted slice, where len - sorted_percent are the
    // new unsorted values and part of the overall distribution.
    let mut v = random_vec(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;

    v[0..sorted_len].sort_unstable();

    v
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    (0..len).map(|_| 66).collect::<Vec<_>>()
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect::<Vec<_>>()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect::<Vec<_>>()
}

pub fn modulo(len: usize, modulus: i32) -> Vec<i32> {
    // :.:.:.:.
    // ::::::::

    // A small universe of repeated keys, i % modulus.
    (0..len).map(|i| (i as i32) % modulus).collect::<Vec<_>>()
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    if len == 0 {
        return Vec::new();
    }

    let mut vals = random_vec(len);
    let chunks_size = len / saw_count.max(1);

    for chunk in vals.chunks_mut(chunks_size) {
        chunk.sort_unstable();
    }

    vals
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    if len == 0 {
        return Vec::new();
    }

    let mut vals = random_vec(len);
    let chunks_size = len / saw_count.max(1);
    let saw_directions = random_uniform((len / chunks_size) + 1, 0..=1);

    for (i, chunk) in vals.chunks_mut(chunks_size).enumerate() {
        if saw_directions[i] == 0 {
            chunk.sort_unstable();
        } else if saw_directions[i] == 1 {
            chunk.sort_unstable_by_key(|&e| std::cmp::Reverse(e));
        } else {
            unreachable!();
        }
    }

    vals
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mut vals = random_vec(len);

    let first_half = &mut vals[0..(len / 2)];
    first_half.sort_unstable();

    let second_half = &mut vals[(len / 2)..len];
    second_half.sort_unstable_by_key(|&e| std::cmp::Reverse(e));

    vals
}

pub fn random_init_seed() -> u64 {
    *SEED_VALUE.get_or_init(|| {
        env::var("OVERRIDE_SEED")
            .ok()
            .map(|seed| u64::from_str(&seed).unwrap())
            .unwrap_or_else(rand_root_seed)
    })
}

pub fn use_random_seed_each_time() {
    // Benchmarks want fresh values on every run, not the repeatable seed the
    // tests use. Only effective if called before the first pattern access.
    let _ = SEED_VALUE.set(thread_rng().gen());
}

// --- Private ---

static SEED_VALUE: OnceLock<u64> = OnceLock::new();

#[cfg(not(miri))]
fn rand_root_seed() -> u64 {
    // Other test code hashes `panic::Location::caller()` and constructs a seed
    // from that, in these tests we want to have a fuzzer like exploration of
    // the test space, if we used the same caller based construction we would
    // always test the same.
    //
    // Instead we use the seconds since UNIX epoch / 10, given CI log output
    // this value should be reasonably easy to re-construct.

    use std::time::{SystemTime, UNIX_EPOCH};

    let epoch_seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    epoch_seconds / 10
}

#[cfg(miri)]
fn rand_root_seed() -> u64 {
    // Miri is usually run with isolation which gives us repeatability but also
    // permutations based on other code that runs before.
    thread_rng().gen()
}

fn keyed_seed<K: Hash>(len: usize, key: &K) -> u64 {
    // Mix the key into the root seed so patterns with different parameters
    // don't replay the same value sequence, while staying repeatable.
    let mut hasher = DefaultHasher::new();
    len.hash(&mut hasher);
    key.hash(&mut hasher);

    random_init_seed() ^ hasher.finish()
}

struct VecCache {
    cache: Mutex<Option<Arc<Vec<i32>>>>,
}

impl VecCache {
    const fn new() -> Self {
        Self {
            cache: Mutex::new(None),
        }
    }

    // Uses fn pointer to avoid accidental captures.
    fn copy_cached_or_gen(&self, len: usize, gen_fn: fn(usize, u64) -> Vec<i32>) -> Vec<i32> {
        let seed_value = random_init_seed();

        // With a fixed seed, rand will produce the same values in sequence,
        // and lock + memcpy is faster than re-generating them, so we cache
        // previous requests. This is mainly true for debug builds, release and
        // miri see little benefit.

        let mut v_cached_lock = self.cache.lock().unwrap();
        let v_cached = v_cached_lock.get_or_insert_with(Default::default);

        if v_cached.len() >= len {
            // Cheap clone to return control to other threads as fast as
            // possible.
            let v_cached_clone = v_cached.clone();
            drop(v_cached_lock);

            return v_cached_clone[..len].to_vec();
        }

        let v_new = Arc::new(gen_fn(len, seed_value));
        // Cheap clone to return control to other threads as fast as possible.
        *v_cached = v_new.clone();
        drop(v_cached_lock);

        v_new.to_vec()
    }
}

fn random_vec(len: usize) -> Vec<i32> {
    static CACHE: VecCache = VecCache::new();

    CACHE.copy_cached_or_gen(len, |len, seed| {
        let mut rng: XorShiftRng = rand::SeedableRng::seed_from_u64(seed);
        (0..len).map(|_| rng.gen::<i32>()).collect()
    })
}
