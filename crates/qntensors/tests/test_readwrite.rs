use qntensors::{
    read_index, write_index, Arrow, Error, IdGenerator, Index, Qn, StreamOptions,
};

fn roundtrip(index: &Index, opts: StreamOptions) -> Index {
    let mut buf = Vec::new();
    write_index(&mut buf, index, opts).unwrap();
    read_index(&mut buf.as_slice(), opts).unwrap()
}

#[test]
fn test_roundtrip_dense() {
    let mut gen = IdGenerator::from_seed(40);
    let i = Index::new(&mut gen, 4, "site,n=2").prime(2);
    let back = roundtrip(&i, StreamOptions::default());
    assert_eq!(back, i);
    assert_eq!(back.dim(), i.dim());
    assert_eq!(back.dir(), i.dir());
    assert_eq!(back.nblock(), 0);
}

#[test]
fn test_roundtrip_with_descriptor() {
    let mut gen = IdGenerator::from_seed(41);
    let i = Index::with_blocks(
        &mut gen,
        vec![(Qn(-1), 1), (Qn(0), 2), (Qn(1), 3)],
        Arrow::In,
        "s",
    )
    .prime(1);
    let back = roundtrip(&i, StreamOptions::default());
    assert_eq!(back, i);
    assert_eq!(back.dir(), Arrow::In);
    assert_eq!(back.nblock(), 3);
    for n in 1..=3 {
        assert_eq!(back.qn(n), i.qn(n));
        assert_eq!(back.blocksize(n), i.blocksize(n));
    }
}

#[test]
fn test_roundtrip_legacy_width() {
    let mut gen = IdGenerator::from_seed(42);
    let i = Index::new(&mut gen, 7, "a");
    let opts = StreamOptions {
        legacy_narrow_ids: true,
    };
    let back = roundtrip(&i, opts);
    assert_eq!(back.id(), i.id() & 0xffff_ffff);
    assert_eq!(back.dim(), i.dim());
    assert_eq!(back.tags(), i.tags());

    // narrow stream is shorter than the wide one
    let mut wide = Vec::new();
    let mut narrow = Vec::new();
    write_index(&mut wide, &i, StreamOptions::default()).unwrap();
    write_index(&mut narrow, &i, opts).unwrap();
    assert_eq!(wide.len(), narrow.len() + 4);
}

#[test]
fn test_write_null_index_refused() {
    let mut buf = Vec::new();
    let err = write_index(&mut buf, &Index::default(), StreamOptions::default());
    assert!(matches!(err, Err(Error::WriteNullIndex)));
}

#[test]
fn test_truncated_stream() {
    let mut gen = IdGenerator::from_seed(43);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 2)], Arrow::Out, "s");
    let mut buf = Vec::new();
    write_index(&mut buf, &i, StreamOptions::default()).unwrap();
    for cut in [1, 8, buf.len() / 2, buf.len() - 1] {
        let short = &buf[..cut];
        assert!(read_index(&mut &short[..], StreamOptions::default()).is_err());
    }
}

#[test]
fn test_descriptor_dimension_mismatch() {
    let mut gen = IdGenerator::from_seed(44);
    let i = Index::with_blocks(&mut gen, vec![(Qn(0), 2), (Qn(1), 2)], Arrow::Out, "s");
    let mut buf = Vec::new();
    write_index(&mut buf, &i, StreamOptions::default()).unwrap();
    // corrupt the last descriptor extent
    let n = buf.len();
    buf[n - 8] = 9;
    let err = read_index(&mut buf.as_slice(), StreamOptions::default());
    assert!(matches!(err, Err(Error::CorruptStream { .. })));
}
