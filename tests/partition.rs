use approx::assert_relative_eq;
use exhibit_rs::ExhibitError;
use exhibit_rs::partition::{Region, form_partition};

#[test]
fn column_weights_set_widths() {
    let p = form_partition(Region::unit(), 1, 3, None, Some(&[2.0, 1.0, 1.0][..])).unwrap();
    assert_eq!(p.cols, vec![0.0, 0.5, 0.75, 1.0]);
    assert_eq!(p.rows, vec![1.0, 0.0]);
}

#[test]
fn rows_run_top_down() {
    let region = Region::new(0.0, 1.0, 0.0, 0.8);
    let p = form_partition(region, 2, 1, Some(&[1.0, 3.0][..]), None).unwrap();
    assert_eq!(p.rows.len(), 3);
    assert_relative_eq!(p.rows[0], 0.8);
    assert_relative_eq!(p.rows[1], 0.6);
    assert_relative_eq!(p.rows[2], 0.0);
    let top = p.cell(0, 0).unwrap();
    assert_relative_eq!(top.top, 0.8);
    assert_relative_eq!(top.bottom, 0.6);
    assert_relative_eq!(p.row_center(1).unwrap(), 0.3);
}

#[test]
fn uniform_grid_cells() {
    let p = form_partition(Region::new(0.2, 0.6, 0.0, 1.0), 4, 2, None, None).unwrap();
    assert_eq!((p.row_count(), p.col_count()), (4, 2));
    assert_relative_eq!(p.col_center(1).unwrap(), 0.5);
    assert_eq!(p.cell(3, 1).unwrap().bottom, 0.0);
    assert!(p.cell(4, 0).is_none());
    assert!(p.col_center(2).is_none());
}

#[test]
fn weight_count_must_match() {
    let err = form_partition(Region::unit(), 2, 2, Some(&[1.0][..]), None).unwrap_err();
    assert!(matches!(
        err,
        ExhibitError::WeightCountMismatch {
            axis: "row",
            expected: 2,
            got: 1
        }
    ));
}

#[test]
fn weights_must_be_positive() {
    let err = form_partition(Region::unit(), 1, 2, None, Some(&[1.0, 0.0][..])).unwrap_err();
    assert!(matches!(err, ExhibitError::InvalidWeights { axis: "column" }));
}

#[test]
fn empty_grids_are_rejected() {
    assert!(matches!(
        form_partition(Region::unit(), 0, 2, None, None),
        Err(ExhibitError::InvalidGrid(_))
    ));
    assert!(form_partition(Region::new(0.5, 0.5, 0.0, 1.0), 1, 1, None, None).is_err());
}

#[test]
fn weighted_columns_over_a_wide_region() {
    let p = form_partition(Region::new(0.0, 3.0, 0.0, 1.0), 2, 2, None, Some(&[2.0, 1.0][..])).unwrap();
    assert_eq!(p.cols, vec![0.0, 2.0, 3.0]);
    assert_eq!(p.rows, vec![1.0, 0.5, 0.0]);
}
