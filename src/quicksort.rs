use core::mem;
use core::ptr;

use crate::heapsort;
use crate::pivot;
use crate::smallsort;

/// Sorts `v` recursively.
///
/// `limit` is the remaining depth budget. Each partitioning level keeps three
/// quarters of it; once it reaches zero the heapsort fallback takes over to
/// keep the `O(n * log(n))` worst-case guarantee.
pub(crate) fn quicksort<'a, T, F>(mut v: &'a mut [T], mut limit: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let len = v.len();

        if len <= smallsort::SMALL_SORT_THRESHOLD {
            smallsort::small_sort(v, is_less);
            return;
        }

        // If too many bad pivot choices were made, simply fall back to
        // heapsort in order to guarantee `O(n * log(n))` worst-case.
        if limit == 0 {
            heapsort::heapsort(v, is_less);
            return;
        }

        let mut pivot = pivot::median_of_five(v, is_less);
        let mut mid = partition(v, &pivot, is_less);

        // A heavily left-skewed split usually means the range contains many
        // elements equivalent to the pivot. Separate them into a band
        // [mid..midr) that no further work has to look at.
        let mut midr = mid;
        if mid <= len >> 3 {
            midr = mid + partition_rev(&mut v[mid..], &pivot, is_less);

            // Still skewed even with the equal elements taken out, so the
            // sampled pivot itself was bad. Median of medians guarantees a
            // pivot inside the central 30% of the range.
            if midr <= len >> 3 {
                pivot = pivot::median_of_medians(v, is_less);
                mid = partition(v, &pivot, is_less);
                midr = mid + partition_rev(&mut v[mid..], &pivot, is_less);
            }
        }

        limit = (limit >> 1) + (limit >> 2);

        debug_assert!(mid <= midr && midr <= len);

        let (left, rest) = v.split_at_mut(mid);
        let (_equal_band, right) = rest.split_at_mut(midr - mid);

        // Recurse into the smaller side and iterate on the larger one. That
        // caps the call stack at `log2(len)` frames and halves the recursion
        // overhead.
        if left.len() <= right.len() {
            quicksort(left, limit, is_less);
            v = right;
        } else {
            quicksort(right, limit, is_less);
            v = left;
        }
    }
}

/// Branchless Lomuto partition of `v` against `pivot`.
///
/// Rearranges `v` such that all elements for which `is_less(elem, pivot)`
/// holds come first, and returns their count `mid`. Postcondition:
/// `v[..mid] < pivot` and `v[mid..] >= pivot`.
///
/// The inner loop swaps unconditionally and advances the write cursor by the
/// comparison result instead of guarding the swap with a branch. The swap of a
/// slot with itself is wasted work exactly when the branch would have been
/// taken, which is the price for an inner loop the branch predictor never
/// sees. Guarding it regresses 2-4x on random data.
fn partition<T, F>(v: &mut [T], pivot: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    partition_impl(v, pivot, &mut |elem, pivot| is_less(elem, pivot))
}

/// Reverse dual of [`partition`]: moves all elements that are *not greater*
/// than `pivot` to the front and returns their count `midr`. Postcondition:
/// `v[..midr] <= pivot` and `v[midr..] > pivot`.
///
/// Applied to the tail `[mid..]` left by [`partition`] with the same pivot,
/// this bunches every pivot-equivalent element into `[mid..midr)`.
fn partition_rev<T, F>(v: &mut [T], pivot: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    partition_impl(v, pivot, &mut |elem, pivot| !is_less(pivot, elem))
}

fn partition_impl<T, F>(v: &mut [T], pivot: &T, pred: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len == 0 {
        return 0;
    }

    let v_base = v.as_mut_ptr();

    // Manually unrolled as micro-optimization, as only x86 gets auto-unrolling
    // but not Arm.
    let unroll_len = if const { mem::size_of::<T>() <= 16 } {
        2
    } else {
        1
    };

    // SAFETY: The bounded loops ensure that `scan` is always in-bounds. `v`
    // and `pivot` can't alias because `pivot` lives in the caller's stack
    // frame. `fill_count` never exceeds the number of processed elements, so
    // the swap destination stays somewhere between `v_base` and `scan`.
    unsafe {
        let mut scan = v_base;
        let mut fill_count = 0;

        macro_rules! loop_body {
            () => {{
                let scan_matches = pred(&*scan, pivot);
                ptr::swap(v_base.add(fill_count), scan);
                fill_count += scan_matches as usize;
                scan = scan.add(1);
            }};
        }

        let unroll_end = v_base.add(len - (unroll_len - 1));
        while scan < unroll_end {
            for _ in 0..unroll_len {
                loop_body!();
            }
        }

        while scan < v_base.add(len) {
            loop_body!();
        }

        fill_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_less_i32(a: &i32, b: &i32) -> bool {
        a < b
    }

    #[test]
    fn partition_splits_lt_ge() {
        let mut v = [9, 1, 8, 2, 7, 3, 6, 4, 5, 5];
        let pivot = 5;

        let mid = partition(&mut v, &pivot, &mut is_less_i32);

        assert_eq!(mid, 4);
        assert!(v[..mid].iter().all(|x| *x < pivot));
        assert!(v[mid..].iter().all(|x| *x >= pivot));
    }

    #[test]
    fn partition_rev_splits_le_gt() {
        let mut v = [9, 1, 8, 2, 7, 3, 6, 4, 5, 5];
        let pivot = 5;

        let midr = partition_rev(&mut v, &pivot, &mut is_less_i32);

        assert_eq!(midr, 6);
        assert!(v[..midr].iter().all(|x| *x <= pivot));
        assert!(v[midr..].iter().all(|x| *x > pivot));
    }

    #[test]
    fn partition_pair_bands_equal_elements() {
        let mut v = [3i32, 0, 3, 1, 3, 2, 3, 4, 3, 5, 3, 6];
        let pivot = 3;

        let mid = partition(&mut v, &pivot, &mut is_less_i32);
        let midr = mid + partition_rev(&mut v[mid..], &pivot, &mut is_less_i32);

        assert!(v[..mid].iter().all(|x| *x < pivot));
        assert!(v[mid..midr].iter().all(|x| *x == pivot));
        assert!(v[midr..].iter().all(|x| *x > pivot));
    }

    #[test]
    fn partition_empty() {
        let mut v: [i32; 0] = [];
        assert_eq!(partition(&mut v, &0, &mut is_less_i32), 0);
        assert_eq!(partition_rev(&mut v, &0, &mut is_less_i32), 0);
    }
}
