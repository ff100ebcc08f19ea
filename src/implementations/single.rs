use crate::stencil::update_row;

/*
  Sequential sweep

  Applies the toppling rule row by row to `dst`, which holds the padded rows
  starting at `first_row`. This is the reference every parallel strategy is
  checked against, and the leaf case of the fork-join scheduler.
*/
pub fn sweep_rows(src: &[u32], dst: &mut [u32], first_row: usize, stride: usize) -> bool {
    let mut changed = false;
    for (r, dst_row) in dst.chunks_mut(stride).enumerate() {
        changed |= update_row(src, dst_row, first_row + r, stride);
    }
    changed
}
