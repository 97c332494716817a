use core::mem::{self, ManuallyDrop};
use core::ptr;

// Pivots are bitwise copies of slice elements, wrapped in `ManuallyDrop` and
// never dropped. The partition loops only ever swap slice slots, so the
// original of every copy stays inside the slice and the permutation invariant
// holds even if the comparison function panics mid-partition.

/// Returns the median of five samples taken across `v` with stride `len / 4`
/// as a pivot copy.
///
/// The five samples are loaded into locals and run through a fixed
/// 7-comparison median network, so apart from the comparisons themselves the
/// network is straight-line code.
pub(crate) fn median_of_five<T, F>(v: &[T], is_less: &mut F) -> ManuallyDrop<T>
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(len >= 5);

    let q = len >> 2;

    // SAFETY: `3 * q < len` and `len >= 5`, so every sampled position is
    // in-bounds. The reads are bitwise copies used only for comparisons; none
    // of them is ever dropped.
    unsafe {
        let mut e0 = ManuallyDrop::new(ptr::read(v.get_unchecked(0)));
        let mut e1 = ManuallyDrop::new(ptr::read(v.get_unchecked(q)));
        let mut e2 = ManuallyDrop::new(ptr::read(v.get_unchecked(2 * q)));
        let mut e3 = ManuallyDrop::new(ptr::read(v.get_unchecked(3 * q)));
        let mut e4 = ManuallyDrop::new(ptr::read(v.get_unchecked(len - 1)));

        // After the first four exchanges e0 is no greater than e1 and e3, and
        // e4 is no smaller than e1 and e3, which pins the overall median into
        // {e1, e2, e3}; the closing three exchanges sort that triple.
        sort2(&mut e0, &mut e1, is_less);
        sort2(&mut e3, &mut e4, is_less);
        sort2(&mut e0, &mut e3, is_less);
        sort2(&mut e1, &mut e4, is_less);

        sort2(&mut e1, &mut e2, is_less);
        sort2(&mut e2, &mut e3, is_less);
        sort2(&mut e1, &mut e2, is_less);

        e2
    }
}

/// Recursive median-of-medians pivot, used when median-of-five repeatedly
/// produced a split with less than an eighth of the range on one side.
///
/// Compacts group medians into the prefix of `v` until fewer than three
/// survive, then returns a copy of `v[0]`. The compaction is done purely with
/// in-range swaps. The resulting pivot is guaranteed to sit within the central
/// 30% of the range, at a linear number of comparisons.
pub(crate) fn median_of_medians<T, F>(v: &mut [T], is_less: &mut F) -> ManuallyDrop<T>
where
    F: FnMut(&T, &T) -> bool,
{
    let mut n = v.len();
    debug_assert!(n >= 1);

    while n >= 3 {
        let mut j = 0;

        let mut i = 0;
        while i + 5 <= n {
            let median_pos = median5_pos(v, i, is_less);
            v.swap(j, median_pos);
            j += 1;
            i += 5;
        }

        // Leftover group of 3 or 4 contributes a 3-element median, one or two
        // stragglers contribute their first element.
        let rem = n - i;
        if rem >= 3 {
            let median_pos = median3_pos(v, i, is_less);
            v.swap(j, median_pos);
            j += 1;
        } else if rem >= 1 {
            v.swap(j, i);
            j += 1;
        }

        n = j;
    }

    // SAFETY: `v` is non-empty; see the module comment on pivot copies.
    unsafe { ManuallyDrop::new(ptr::read(v.as_ptr())) }
}

/// Compare-and-swap of two pivot-copy locals, ensuring `a <= b`.
#[inline(always)]
fn sort2<T, F>(a: &mut ManuallyDrop<T>, b: &mut ManuallyDrop<T>, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if is_less(&**b, &**a) {
        mem::swap(a, b);
    }
}

/// Position of the median of `v[base..base + 5]`.
///
/// Runs the same 7-comparison network as [`median_of_five`], but permutes an
/// index array instead of the values so the caller can swap the median to
/// where it is needed. `v` itself is not reordered.
fn median5_pos<T, F>(v: &[T], base: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(base + 5 <= v.len());

    let mut ix = [base, base + 1, base + 2, base + 3, base + 4];

    sort2_pos(v, &mut ix, 0, 1, is_less);
    sort2_pos(v, &mut ix, 3, 4, is_less);
    sort2_pos(v, &mut ix, 0, 3, is_less);
    sort2_pos(v, &mut ix, 1, 4, is_less);

    sort2_pos(v, &mut ix, 1, 2, is_less);
    sort2_pos(v, &mut ix, 2, 3, is_less);
    sort2_pos(v, &mut ix, 1, 2, is_less);

    ix[2]
}

/// Position of the median of `v[base..base + 3]`, by a 3-comparison network.
fn median3_pos<T, F>(v: &[T], base: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(base + 3 <= v.len());

    let mut ix = [base, base + 1, base + 2];

    sort2_pos(v, &mut ix, 0, 1, is_less);
    sort2_pos(v, &mut ix, 1, 2, is_less);
    sort2_pos(v, &mut ix, 0, 1, is_less);

    ix[1]
}

#[inline(always)]
fn sort2_pos<T, F>(v: &[T], ix: &mut [usize], a: usize, b: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    if is_less(&v[ix[b]], &v[ix[a]]) {
        ix.swap(a, b);
    }
}
