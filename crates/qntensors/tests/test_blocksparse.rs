use approx::assert_relative_eq;
use qntensors::storage::blocksparse::{block_div, inverse_block_index};
use qntensors::{Arrow, BlockSparse, IdGenerator, Index, IndexSet, Qn};

fn worked_example_set() -> IndexSet {
    let mut gen = IdGenerator::from_seed(20);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 3)], Arrow::Out, "i");
    let j = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 3)], Arrow::Out, "j");
    IndexSet::new(vec![i, j])
}

#[test]
fn test_worked_example_divergence_one() {
    let set = worked_example_set();
    let t = BlockSparse::new(&set, Qn(1));

    // only mixed sectors sum to QN(1); (0,0) and (1,1) are excluded
    assert_eq!(t.offsets().len(), 2);
    let retained: Vec<_> = t
        .offsets()
        .iter()
        .map(|bo| inverse_block_index(bo.block, &set))
        .collect();
    assert_eq!(retained[0].as_slice(), &[1, 0]);
    assert_eq!(retained[1].as_slice(), &[0, 1]);

    // strictly ascending directory, buffer length 3*2 + 2*3
    assert!(t.offsets().windows(2).all(|w| w[0].block < w[1].block));
    assert_eq!(t.len(), 12);

    for bo in t.offsets() {
        let coords = inverse_block_index(bo.block, &set);
        assert_eq!(block_div(&coords, &set), Qn(1));
    }
    assert_eq!(t.calc_div(&set), Qn(1));
}

#[test]
fn test_offset_lookup() {
    let set = worked_example_set();
    let t = BlockSparse::new(&set, Qn(1));
    for bo in t.offsets() {
        assert_eq!(t.offset_of(bo.block), Some(bo.offset));
    }
    assert_eq!(t.offset_of(0), None);
    assert_eq!(t.offset_of(3), None);
    assert_eq!(t.offset_of(99), None);
}

#[test]
fn test_structural_zero_blocks() {
    let set = worked_example_set();
    let t = BlockSparse::new(&set, Qn(1));
    assert!(t.get_block(&set, &[0, 0]).is_none());
    assert!(t.get_block(&set, &[1, 1]).is_none());
    assert_eq!(t.get_block(&set, &[1, 0]).map(|b| b.len()), Some(6));
}

#[test]
fn test_element_addressing_column_major() {
    let set = worked_example_set();
    let mut t = BlockSparse::new(&set, Qn(1));
    // fill block (1,0): global rows 2..5, cols 0..2, column-major
    let mut v = 0.0;
    for col in 0..2 {
        for row in 2..5 {
            *t.get_elt_mut(&set, &[row, col]).unwrap() = v;
            v += 1.0;
        }
    }
    for (n, &x) in t.data()[..6].iter().enumerate() {
        assert_relative_eq!(x, n as f64);
    }
    assert_eq!(t.get_elt(&set, &[0, 0]), None);
    assert_eq!(t.get_elt(&set, &[0, 2]), Some(0.0)); // block (0,1), untouched
}

#[test]
fn test_divergence_zero_retains_diagonal() {
    let set = worked_example_set();
    let t = BlockSparse::new(&set, Qn(0));
    assert_eq!(t.offsets().len(), 2);
    assert_eq!(t.len(), 2 * 2 + 3 * 3);
    assert_eq!(t.calc_div(&set), Qn(0));
}

#[test]
fn test_opposite_orientations() {
    let mut gen = IdGenerator::from_seed(21);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(1), 2)], Arrow::Out, "i");
    let j = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(1), 2)], Arrow::In, "j");
    let set = IndexSet::new(vec![i, j]);
    // In flips the sign: conserving blocks are the matching sectors
    let t = BlockSparse::new(&set, Qn(0));
    assert_eq!(t.offsets().len(), 2);
    assert_eq!(t.len(), 1 * 1 + 2 * 2);
}

#[test]
fn test_elementwise_suite() {
    let set = worked_example_set();
    let mut t = BlockSparse::new(&set, Qn(1));
    let mut counter = 0.0;
    t.generate(|| {
        counter += 1.0;
        counter
    });
    assert_relative_eq!(t.data()[0], 1.0);
    assert_relative_eq!(t.data()[11], 12.0);

    t.map(|x| 2.0 * x);
    assert_relative_eq!(t.data()[11], 24.0);

    let mut total = 0.0;
    t.visit(0.5, |x| total += x);
    assert_relative_eq!(total, (1..=12).sum::<i32>() as f64);

    t.scale(0.5);
    assert_relative_eq!(t.data()[0], 1.0);

    let other = t.clone();
    t.accumulate(2.0, &other);
    assert_relative_eq!(t.data()[0], 3.0);
}

#[test]
fn test_norm_ignores_external_scale() {
    let set = worked_example_set();
    let mut t = BlockSparse::new(&set, Qn(1));
    t.generate(|| 2.0);
    assert_relative_eq!(t.norm(), (12.0 * 4.0f64).sqrt());
}

#[test]
fn test_three_index_addressing() {
    let mut gen = IdGenerator::from_seed(22);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(1), 1)], Arrow::Out, "i");
    let j = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 1)], Arrow::Out, "j");
    let k = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(2), 2)], Arrow::In, "k");
    let set = IndexSet::new(vec![i, j, k]);
    let t = BlockSparse::new(&set, Qn(1));
    // conserving coords: qn(i) + qn(j) - qn(k) == 1
    for bo in t.offsets() {
        let coords = inverse_block_index(bo.block, &set);
        assert_eq!(block_div(&coords, &set), Qn(1));
    }
    let occupied: usize = t.offsets().len();
    // (1,0,0) and (0,1,0) conserve; (1,1,2)-style sums do not reach 1
    assert_eq!(occupied, 2);
    assert!(t.get_elt(&set, &[1, 0, 0]).is_some());
    assert!(t.get_elt(&set, &[0, 2, 0]).is_some());
    assert!(t.get_elt(&set, &[0, 0, 0]).is_none());
}
