/*! Text correction with a dictionary speller and ordered rewrite rules.

Corrects raw text in four ordered stages (spelling, grammar, punctuation
and fluency), reconstructs a per-token correction history by diffing the
original against the corrected text, and scores text quality with
heuristic readability and fluency metrics.

# Usage examples

```
use fluentfix::{diff, metrics, Corrector, StageSet};

let corrector = Corrector::new().unwrap();
let correction = corrector.correct("i teh  good good cat", &StageSet::all(), 0.7);
assert_eq!(correction.text, "I the excellent cat.");

let records = diff::find_differences("teh cat sat", "the cat sat");
assert_eq!(records.len(), 1);

let score = metrics::readability(&correction.text);
assert!((0.0..=100.0).contains(&score));
```

Further examples of how to use the library can be found in
[`fluentfix-bin`] in the same repository.

[`fluentfix-bin`]: (https://github.com/divvun/fluentfix)

*/

#![warn(missing_docs)]
pub mod config;
pub mod diff;
pub mod grammar;
pub mod history;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod rules;
pub mod speller;
pub mod tokenizer;

mod error;

pub use crate::config::CorrectorConfig;
pub use crate::diff::{find_differences, CorrectionKind, CorrectionRecord};
pub use crate::error::{Error, Result};
pub use crate::history::CorrectionLog;
pub use crate::pipeline::{Correction, Corrector, CorrectorBuilder, Stage, StageSet, Suggestion};
