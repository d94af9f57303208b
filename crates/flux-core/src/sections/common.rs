use flux_ingest::DatasetIndex;

use crate::context::SharedContext;
use crate::error::SectionResult;
use crate::section::SectionOutput;

const EXPLORER_SOURCE: &str = "\
import glob

tables = {path[:-4]: pd.read_csv(path) for path in sorted(glob.glob('*.csv'))}
sorted(tables)";

/// Closing cell that loads every CSV next to the notebook for ad-hoc queries.
pub(super) fn explorer(index: &DatasetIndex, _ctx: &mut SharedContext) -> SectionResult<SectionOutput> {
    let text = format!(
        "## Explore\n\nThe tables above are saved as CSV files next to this notebook. \
         The cell below loads them into `tables` for further analysis of `{}`.",
        index.root().display()
    );
    Ok(SectionOutput::new().markdown(text).code(EXPLORER_SOURCE))
}
