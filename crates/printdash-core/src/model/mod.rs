// ── Presentation model ──
//
// Static per-session configuration types: which columns exist, how raw
// values are colored and relabeled, and which columns the user has chosen
// to see. Plus the per-refresh `DeviceRow` transform.

mod column;
mod overrides;
mod row;
mod rule;
mod visible;

pub use column::ColumnDef;
pub use overrides::DisplayOverrides;
pub use row::{DeviceRow, format_value, rows_from_response};
pub use rule::{ClassFn, ColorRule, ColorRules, MatchArm, RangeRule, Threshold, parse_float_prefix, to_number};
pub use visible::VisibleSet;
