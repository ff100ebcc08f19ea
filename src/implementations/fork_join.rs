use crate::implementations::single::sweep_rows;

/*
  Fork-join sweep (divide and conquer)

  Key points:
  1. Ranges of at most `threshold` rows are computed sequentially
  2. Larger ranges are split at the midpoint with split_at_mut, so each half
     owns its rows of the write buffer exclusively
  3. rayon::join runs one half inline and leaves the other stealable,
     then waits for both
  4. `src` is shared read-only for the whole sweep, no locks needed
*/
pub fn fork_join_sweep(
    src: &[u32],
    dst: &mut [u32],
    first_row: usize,
    stride: usize,
    threshold: usize,
) -> bool {
    let num_rows = dst.len() / stride;

    if num_rows <= threshold.max(1) {
        return sweep_rows(src, dst, first_row, stride);
    }

    let mid = num_rows / 2;
    // 書き込み先を上下に分割：各タスクは自分の行だけを書き換える
    let (upper, lower) = dst.split_at_mut(mid * stride);

    let (upper_changed, lower_changed) = rayon::join(
        || fork_join_sweep(src, upper, first_row, stride, threshold),
        || fork_join_sweep(src, lower, first_row + mid, stride, threshold),
    );

    upper_changed || lower_changed
}
