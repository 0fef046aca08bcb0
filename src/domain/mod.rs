// Domain layer: caller-facing input records, normalized internal records, and
// batch outcome types. No knowledge of HTTP or providers.

pub mod model;
