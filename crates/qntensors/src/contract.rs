//! Quantum-number-conserving contraction of block-sparse tensors.
//!
//! Contracted index pairs are indices equal under index equality (prime
//! level included) carried with opposite orientations. The result's
//! divergence is the sum of the operand divergences, and its directory and
//! buffer are built by the same conservation rule as storage construction.
//! The per-block kernel is a naive column-major loop nest.

use smallvec::SmallVec;

use crate::error::Error;
use crate::index_set::IndexSet;
use crate::storage::blocksparse::{block_index, inverse_block_index, BlockSparse};

/// Contract two block-sparse tensors over their shared indices.
///
/// Returns the surviving index set (uncontracted indices of the first
/// operand, then of the second) and the freshly built result storage.
pub fn contract(
    is_a: &IndexSet,
    a: &BlockSparse,
    is_b: &IndexSet,
    b: &BlockSparse,
) -> Result<(IndexSet, BlockSparse), Error> {
    let mut con_a: Vec<usize> = Vec::new();
    let mut con_b: Vec<usize> = Vec::new();
    for (i, ia) in is_a.iter().enumerate() {
        for (j, ib) in is_b.iter().enumerate() {
            if ia == ib {
                if ia.dir() == ib.dir() {
                    return Err(Error::SameOrientation {
                        index: ia.to_string(),
                    });
                }
                con_a.push(i);
                con_b.push(j);
            }
        }
    }
    let unc_a: Vec<usize> = (0..is_a.rank()).filter(|i| !con_a.contains(i)).collect();
    let unc_b: Vec<usize> = (0..is_b.rank()).filter(|j| !con_b.contains(j)).collect();

    let mut surviving = Vec::with_capacity(unc_a.len() + unc_b.len());
    surviving.extend(unc_a.iter().map(|&i| is_a[i].clone()));
    surviving.extend(unc_b.iter().map(|&j| is_b[j].clone()));
    let is_c = IndexSet::new(surviving);

    let div_c = a.calc_div(is_a) + b.calc_div(is_b);
    let mut c = BlockSparse::new(&is_c, div_c);
    log::debug!(
        "contract: {} shared pairs, result rank {}, divergence {}",
        con_a.len(),
        is_c.rank(),
        div_c
    );

    for boa in a.offsets() {
        let ca = inverse_block_index(boa.block, is_a);
        let dims_a: SmallVec<[usize; 8]> = ca
            .iter()
            .zip(is_a.iter())
            .map(|(&s, i)| i.blocksize0(s))
            .collect();
        let str_a = col_major_strides(&dims_a);
        for bob in b.offsets() {
            let cb = inverse_block_index(bob.block, is_b);
            if !con_a
                .iter()
                .zip(con_b.iter())
                .all(|(&i, &j)| ca[i] == cb[j])
            {
                continue;
            }
            let dims_b: SmallVec<[usize; 8]> = cb
                .iter()
                .zip(is_b.iter())
                .map(|(&s, i)| i.blocksize0(s))
                .collect();
            let str_b = col_major_strides(&dims_b);

            let mut cc: SmallVec<[usize; 8]> = SmallVec::new();
            cc.extend(unc_a.iter().map(|&i| ca[i]));
            cc.extend(unc_b.iter().map(|&j| cb[j]));
            let cbase = match c.offset_of(block_index(&cc, &is_c)) {
                Some(o) => o,
                None => {
                    debug_assert!(false, "conserving block pair missing from result");
                    continue;
                }
            };
            let dims_c: SmallVec<[usize; 8]> = cc
                .iter()
                .zip(is_c.iter())
                .map(|(&s, i)| i.blocksize0(s))
                .collect();
            let str_c = col_major_strides(&dims_c);

            let ext_ua: SmallVec<[usize; 8]> = unc_a.iter().map(|&i| dims_a[i]).collect();
            let astr_ua: SmallVec<[usize; 8]> = unc_a.iter().map(|&i| str_a[i]).collect();
            let cstr_ua: SmallVec<[usize; 8]> = (0..unc_a.len()).map(|p| str_c[p]).collect();
            let ext_ub: SmallVec<[usize; 8]> = unc_b.iter().map(|&j| dims_b[j]).collect();
            let bstr_ub: SmallVec<[usize; 8]> = unc_b.iter().map(|&j| str_b[j]).collect();
            let cstr_ub: SmallVec<[usize; 8]> =
                (0..unc_b.len()).map(|p| str_c[unc_a.len() + p]).collect();
            let ext_con: SmallVec<[usize; 8]> = con_a.iter().map(|&i| dims_a[i]).collect();
            let astr_con: SmallVec<[usize; 8]> = con_a.iter().map(|&i| str_a[i]).collect();
            let bstr_con: SmallVec<[usize; 8]> = con_b.iter().map(|&j| str_b[j]).collect();

            let n_ua: usize = ext_ua.iter().product();
            let n_ub: usize = ext_ub.iter().product();
            let n_con: usize = ext_con.iter().product();

            let adata = &a.data()[boa.offset..];
            let bdata = &b.data()[bob.offset..];
            for lc in 0..n_con {
                let (ac, bc) = unravel(lc, &ext_con, &astr_con, &bstr_con);
                for lb in 0..n_ub {
                    let (bu, cb_off) = unravel(lb, &ext_ub, &bstr_ub, &cstr_ub);
                    let y = bdata[bu + bc];
                    for la in 0..n_ua {
                        let (au, ca_off) = unravel(la, &ext_ua, &astr_ua, &cstr_ua);
                        c.data_mut()[cbase + ca_off + cb_off] += adata[au + ac] * y;
                    }
                }
            }
        }
    }
    Ok((is_c, c))
}

/// Column-major strides for a block's extents (index 0 fastest).
fn col_major_strides(dims: &[usize]) -> SmallVec<[usize; 8]> {
    let mut strides: SmallVec<[usize; 8]> = SmallVec::with_capacity(dims.len());
    let mut acc = 1;
    for &d in dims {
        strides.push(acc);
        acc *= d;
    }
    strides
}

/// Decompose a linear counter over `ext` (first coordinate fastest) into
/// two offsets accumulated with the given stride sets.
fn unravel(mut lin: usize, ext: &[usize], str1: &[usize], str2: &[usize]) -> (usize, usize) {
    let mut o1 = 0;
    let mut o2 = 0;
    for (k, &e) in ext.iter().enumerate() {
        let coord = lin % e;
        lin /= e;
        o1 += coord * str1[k];
        o2 += coord * str2[k];
    }
    (o1, o2)
}
