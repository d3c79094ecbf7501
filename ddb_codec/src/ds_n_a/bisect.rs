use std::cmp::Ordering;

/// The first index whose element compares greater than the probe.
/// `cmp` orders an element against the probe. `items` must be sorted under it.
pub fn bisect_right<T, Cmp>(items: &[T], cmp: Cmp) -> usize
where
    Cmp: Fn(&T) -> Ordering,
{
    let mut lo = 0;
    let mut hi = items.len();
    while lo < hi {
        let md = lo + (hi - lo) / 2;
        if cmp(&items[md]).is_le() {
            lo = md + 1;
        } else {
            hi = md;
        }
    }
    lo
}

/// The last index whose element is `<=` the probe, or -1.
pub fn as_of<T, Cmp>(items: &[T], cmp: Cmp) -> i64
where
    Cmp: Fn(&T) -> Ordering,
{
    bisect_right(items, cmp) as i64 - 1
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;
    use itertools::iproduct;

    fn build(ct3: usize, ct5: usize, ct7: usize) -> Vec<i32> {
        let mut vec = vec![3; ct3];
        vec.extend(vec![5; ct5]);
        vec.extend(vec![7; ct7]);
        vec
    }

    #[test]
    fn runs_of_duplicates() -> Result<()> {
        for (ct3, ct5, ct7) in iproduct!(0..5, 0..5, 0..5) {
            let vec = build(ct3, ct5, ct7);
            let right = |probe: i32| bisect_right(&vec, |x| x.cmp(&probe));

            assert_eq!(right(2), 0);
            assert_eq!(right(3), ct3);
            assert_eq!(right(4), ct3);
            assert_eq!(right(5), ct3 + ct5);
            assert_eq!(right(6), ct3 + ct5);
            assert_eq!(right(7), vec.len());
            assert_eq!(right(8), vec.len());
        }
        Ok(())
    }

    #[test]
    fn as_of_points() -> Result<()> {
        let vec = vec![1, 2, 3];
        assert_eq!(as_of(&vec, |x| x.cmp(&2)), 1);
        assert_eq!(as_of(&vec, |x| x.cmp(&0)), -1);
        assert_eq!(as_of(&vec, |x| x.cmp(&9)), 2);
        assert_eq!(as_of::<i32, _>(&[], |x| x.cmp(&9)), -1);
        Ok(())
    }
}
