use foundation::RecordId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The map library rejected a call (constructor threw, bad style URL, …).
    Provider(String),
    MarkerRejected { record: RecordId, reason: String },
    RouteRejected { route: String, reason: String },
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::Provider(msg) => write!(f, "map provider error: {msg}"),
            MapError::MarkerRejected { record, reason } => {
                write!(f, "marker for record {record} rejected: {reason}")
            }
            MapError::RouteRejected { route, reason } => {
                write!(f, "route {route} rejected: {reason}")
            }
        }
    }
}

impl std::error::Error for MapError {}
