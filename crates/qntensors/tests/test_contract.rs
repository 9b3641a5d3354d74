use approx::assert_relative_eq;
use qntensors::{
    contract, contract_combiner, Arrow, BlockSparse, Combiner, IdGenerator, Index, IndexSet, Qn,
};

fn counting_fill(t: &mut BlockSparse) {
    let mut v = 0.0;
    t.generate(|| {
        v += 1.0;
        v
    });
}

#[test]
fn test_matrix_vector() {
    let mut gen = IdGenerator::from_seed(30);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 1)], Arrow::Out, "i");
    let j = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 1)], Arrow::In, "j");
    let is_a = IndexSet::new(vec![i.clone(), j.clone()]);
    let mut a = BlockSparse::new(&is_a, Qn(0));
    counting_fill(&mut a); // sector (0,0): [[1,3],[2,4]] column-major; sector (1,1): [5]

    let jv = j.clone().dag();
    let is_v = IndexSet::new(vec![jv]);
    let mut v = BlockSparse::new(&is_v, Qn(0));
    v.data_mut().copy_from_slice(&[10.0, 20.0]);

    let (is_c, c) = contract(&is_a, &a, &is_v, &v).unwrap();
    assert_eq!(is_c.rank(), 1);
    assert_eq!(is_c[0], i);
    assert_eq!(c.calc_div(&is_c), Qn(0));
    assert_eq!(c.len(), 2);
    assert_relative_eq!(c.data()[0], 1.0 * 10.0 + 3.0 * 20.0);
    assert_relative_eq!(c.data()[1], 2.0 * 10.0 + 4.0 * 20.0);
}

#[test]
fn test_matrix_matrix_against_dense() {
    let mut gen = IdGenerator::from_seed(31);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 1)], Arrow::Out, "i");
    let j = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 1)], Arrow::In, "j");
    let k = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 1)], Arrow::In, "k");

    let is_a = IndexSet::new(vec![i.clone(), j.clone()]);
    let mut a = BlockSparse::new(&is_a, Qn(0));
    counting_fill(&mut a);

    let is_b = IndexSet::new(vec![j.dag(), k.clone()]);
    let mut b = BlockSparse::new(&is_b, Qn(0));
    counting_fill(&mut b);

    let (is_c, c) = contract(&is_a, &a, &is_b, &b).unwrap();
    assert_eq!(is_c, IndexSet::new(vec![i, k]));
    assert_eq!(c.len(), 5);
    // dense check within the QN(0) sector: [[1,3],[2,4]] * [[1,3],[2,4]]
    assert_relative_eq!(c.data()[0], 7.0);
    assert_relative_eq!(c.data()[1], 10.0);
    assert_relative_eq!(c.data()[2], 15.0);
    assert_relative_eq!(c.data()[3], 22.0);
    // QN(1) sector: 5 * 5
    assert_relative_eq!(c.data()[4], 25.0);
}

#[test]
fn test_divergences_add() {
    let mut gen = IdGenerator::from_seed(32);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(1), 1)], Arrow::Out, "i");
    let j = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(1), 1)], Arrow::In, "j");
    let k = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(1), 1)], Arrow::Out, "k");

    let is_a = IndexSet::new(vec![i, j.clone()]);
    let mut a = BlockSparse::new(&is_a, Qn(1));
    counting_fill(&mut a);
    let is_b = IndexSet::new(vec![j.dag(), k]);
    let mut b = BlockSparse::new(&is_b, Qn(1));
    counting_fill(&mut b);

    let (is_c, c) = contract(&is_a, &a, &is_b, &b).unwrap();
    assert_eq!(c.calc_div(&is_c), Qn(2));
}

#[test]
fn test_inner_product() {
    let mut gen = IdGenerator::from_seed(33);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 3), (Qn(1), 2)], Arrow::Out, "i");
    let is_u = IndexSet::new(vec![i.clone()]);
    let is_w = IndexSet::new(vec![i.dag()]);
    let mut u = BlockSparse::new(&is_u, Qn(1));
    let mut w = BlockSparse::new(&is_w, Qn(-1));
    u.data_mut().copy_from_slice(&[1.0, 2.0]);
    w.data_mut().copy_from_slice(&[3.0, 4.0]);

    let (is_c, c) = contract(&is_u, &u, &is_w, &w).unwrap();
    assert_eq!(is_c.rank(), 0);
    assert_eq!(c.calc_div(&is_c), Qn::ZERO);
    assert_relative_eq!(c.data()[0], 1.0 * 3.0 + 2.0 * 4.0);
}

#[test]
fn test_combiner_roundtrip_preserves_values() {
    let mut gen = IdGenerator::from_seed(34);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 1)], Arrow::Out, "i");
    let j = Index::with_blocks(&mut gen, vec![(Qn(0), 1), (Qn(1), 2)], Arrow::Out, "j");
    let set = IndexSet::new(vec![i.clone(), j.clone()]);
    let mut t = BlockSparse::new(&set, Qn(1));
    counting_fill(&mut t);

    let comb = Combiner::new(&mut gen, vec![i, j], "c");
    let (merged_set, merged) = contract_combiner(&set, &t, &comb);
    assert_eq!(merged_set.rank(), 1);
    assert_eq!(merged_set[0].dim(), set[0].dim() * set[1].dim());
    assert_eq!(merged.data(), t.data());
    assert_eq!(merged.offsets(), t.offsets());

    let (split_set, split) = contract_combiner(&merged_set, &merged, &comb);
    assert_eq!(split_set, set);
    assert_eq!(split.data(), t.data());
    assert_eq!(split.calc_div(&split_set), Qn(1));
}
