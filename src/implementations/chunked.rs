use rayon::prelude::*;

use crate::stencil::update_row;

//書き込み先を行単位で完全に分離することで、ロック不要の並列化を実現する
pub fn chunked_sweep(src: &[u32], dst: &mut [u32], first_row: usize, stride: usize) -> bool {
    dst.par_chunks_mut(stride) // 行ごとにスライスを分割
        .enumerate()
        .map(|(r, dst_row)| update_row(src, dst_row, first_row + r, stride))
        // any() は短絡評価で残りの行を書かない可能性があるため reduce を使う
        .reduce(|| false, |a, b| a || b)
}
