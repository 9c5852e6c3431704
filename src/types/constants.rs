/// Role given to the root input file
pub const MAIN_ROLE: &str = "Main";

/// Per-case manifest written inside every case directory
pub const CASE_INFO_FILE: &str = "case_info.json";

/// Study-level manifest written at the top of the output directory
pub const SUMMARY_FILE: &str = "test_cases_summary.json";

/// Narrowest zero padding used for case directory names
pub const MIN_CASE_INDEX_WIDTH: usize = 3;

/// Capacity of the run update channel
pub const UPDATE_CHANNEL_CAPACITY: usize = 1024;

/// Digits needed so that `case_count` case names never collide
pub fn case_index_width(case_count: usize) -> usize {
    case_count.max(1).to_string().len().max(MIN_CASE_INDEX_WIDTH)
}

/// Name of the case directory for a 1-based case index
pub fn case_name(index: usize, width: usize) -> String {
    format!("case_{:0width$}", index, width = width)
}
