use chrono::{DateTime, Utc};
use derive_new::new;

/// 半開区間 [start, end) の時間帯
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    // 重複条件：
    //     self.start < other.end AND other.start < self.end
    // この一対の不等式だけで「開始が食い込む」「終了が食い込む」
    // 「完全に包含する」の三パターンすべてを判定できる。
    // 呼び出し側で個別に場合分けしてはならない。
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}
