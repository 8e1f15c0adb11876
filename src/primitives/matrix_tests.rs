pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-12);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-12);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0]);
    assert!(matches!(
        result,
        Err(CdeepsoError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_zeros() {
    let m = Matrix::zeros(4, 2);
    assert_eq!(m.shape(), (4, 2));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_row_and_row_mut() {
    let mut m = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);

    m.row_mut(0)[2] = -3.0;
    assert!((m.get(0, 2) + 3.0).abs() < 1e-12);
}

#[test]
fn test_copy_row_from() {
    let src = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0])
        .expect("test data has correct dimensions: 2*2=4 elements");
    let mut dst = Matrix::zeros(3, 2);
    dst.copy_row_from(&src, 1, 2);

    assert_eq!(dst.row(2), &[3.0, 4.0]);
    assert_eq!(dst.row(0), &[0.0, 0.0]);
}

#[test]
fn test_rows_iterator() {
    let m = Matrix::from_vec(3, 1, vec![7.0, 8.0, 9.0])
        .expect("test data has correct dimensions: 3*1=3 elements");
    let firsts: Vec<f64> = m.rows().map(|r| r[0]).collect();
    assert_eq!(firsts, vec![7.0, 8.0, 9.0]);

    let empty = Matrix::zeros(3, 0);
    assert_eq!(empty.rows().count(), 0);
}

#[test]
fn test_set() {
    let mut m = Matrix::zeros(2, 2);
    m.set(1, 0, 5.5);
    assert!((m.get(1, 0) - 5.5).abs() < 1e-12);
    assert!((m.as_slice()[2] - 5.5).abs() < 1e-12);
}
