//! Recognized feed headers and localized labels

pub const DATE: &str = "日付";
pub const EVENT: &str = "イベント名";
pub const PLAYER: &str = "氏名";
pub const OWN_DECK: &str = "使用デッキ";
pub const TURN_ORDER: &str = "先手後手";
pub const OPPONENT_DECK: &str = "相手デッキ";
pub const OPPONENT: &str = "相手プレイヤ";
pub const OUTCOME: &str = "勝敗";
pub const WIN_FLAG: &str = "win_flag";
pub const ENVIRONMENT: &str = "環境";
pub const NOTE: &str = "メモ";
pub const EDIT_URL: &str = "編集用URL";

pub const LABEL_FIRST: &str = "先攻";
pub const LABEL_SECOND: &str = "後攻";
pub const LABEL_WIN: &str = "勝ち";
pub const LABEL_LOSS: &str = "負け";

/// Header written when the append path creates a new feed.
pub const APPEND_HEADER: [&str; 11] = [
    EDIT_URL,
    DATE,
    EVENT,
    PLAYER,
    OWN_DECK,
    TURN_ORDER,
    OPPONENT_DECK,
    OPPONENT,
    OUTCOME,
    ENVIRONMENT,
    NOTE,
];
