use trapmap_geometry::{Point2d, Segment2d};

/// Rejected registrations in the
/// [`TrapezoidalMapDataset`](crate::TrapezoidalMapDataset).
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum DatasetError {
    /// The segment's endpoints coincide.
    #[error("segment endpoints coincide at {0}")]
    Degenerate(Point2d),
    /// An endpoint lies outside the bounding rectangle.
    #[error("endpoint {0} lies outside the bounding rectangle")]
    OutOfBounds(Point2d),
    /// The segment was registered before. Re-inserting a segment into the
    /// map is unsupported, so the registry refuses the duplicate up front.
    #[error("segment {0} is already registered")]
    AlreadyRegistered(Segment2d),
}

/// Precondition violations surfaced by
/// [`build_trapezoidal_map`](crate::build_trapezoidal_map).
///
/// The dataset collaborator must know the inserted segment and both of its
/// endpoints before the insertion starts.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
pub enum InsertError {
    /// An endpoint of the inserted segment was never registered.
    #[error("endpoint {0} is not registered in the dataset")]
    UnregisteredEndpoint(Point2d),
    /// The inserted segment was never registered.
    #[error("segment {0} is not registered in the dataset")]
    UnregisteredSegment(Segment2d),
}
