pub mod activity_label;
pub mod label;
pub mod memo;
pub mod section_header;
pub mod style;

#[cfg(test)]
mod label_tests;
#[cfg(test)]
mod section_header_tests;

pub use activity_label::{ActivityLabel, ActivityLabelState};
pub use label::{fit_to_width, Label};
pub use memo::Memo;
pub use section_header::{SectionHeader, SectionHeaderState, SectionHeaderView, DEFAULT_HEADER_BACKGROUND};
pub use style::merge_styles;
