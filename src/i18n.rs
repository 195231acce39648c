//! Translation provider: per-locale key tables with `{{name}}` substitution.
//!
//! The translator is an explicit value owned by the app state and passed down
//! to the views; there is no ambient global locale. Unknown keys echo the key
//! itself so a missing entry is visible instead of blank.

/// Supported locales, keyed by the BCP-47-ish tags the settings panel stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    ZhCn,
    ZhTw,
    EnUs,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::ZhCn, Locale::ZhTw, Locale::EnUs];

    pub fn as_tag(self) -> &'static str {
        match self {
            Locale::ZhCn => "zh-CN",
            Locale::ZhTw => "zh-TW",
            Locale::EnUs => "en-US",
        }
    }

    /// Parse a stored tag; anything unrecognized falls back to the default.
    pub fn from_tag(tag: &str) -> Locale {
        match tag {
            "zh-TW" => Locale::ZhTw,
            "en-US" => Locale::EnUs,
            _ => Locale::ZhCn,
        }
    }

    /// Human-readable name shown in the settings language picker.
    pub fn display_name(self) -> &'static str {
        match self {
            Locale::ZhCn => "中文 (简体)",
            Locale::ZhTw => "中文 (繁体)",
            Locale::EnUs => "English (US)",
        }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Locale::ZhCn => ZH_CN,
            Locale::ZhTw => ZH_TW,
            Locale::EnUs => EN_US,
        }
    }
}

/// Locale + lookup, handed down to every view.
#[derive(Debug, Clone, Copy, Default)]
pub struct Translator {
    locale: Locale,
}

impl Translator {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
    }

    /// Look a key up in the active locale; unknown keys echo back.
    pub fn t(&self, key: &str) -> String {
        self.locale
            .table()
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| (*v).to_owned())
            .unwrap_or_else(|| key.to_owned())
    }

    /// Like [`t`](Self::t), substituting `{{name}}` template variables.
    pub fn t_with(&self, key: &str, vars: &[(&str, &str)]) -> String {
        let mut text = self.t(key);
        for (name, value) in vars {
            text = text.replace(&format!("{{{{{name}}}}}"), value);
        }
        text
    }
}

const ZH_CN: &[(&str, &str)] = &[
    // 导航
    ("nav.chat", "聊天"),
    ("nav.calendar", "日历"),
    ("nav.game", "游戏"),
    ("nav.settings", "设置"),
    // 游戏
    ("game.title", "AI算命小游戏"),
    ("game.description", "结合中国传统命理文化与现代AI技术的互动小游戏"),
    ("game.fiveElements", "五行匹配游戏"),
    ("game.fiveElementsDesc", "测试你对五行相生相克的了解程度"),
    ("game.fortuneTelling", "AI算命"),
    ("game.fortuneTellingDesc", "获取个性化的命理解读"),
    ("game.startGame", "开始游戏"),
    ("game.back", "返回"),
    ("game.score", "得分"),
    ("game.time", "时间"),
    ("game.round", "回合"),
    ("game.whatGenerates", "{{element}}生什么？"),
    ("game.whatConquers", "{{element}}克什么？"),
    ("game.correct", "回答正确！"),
    ("game.incorrect", "回答错误！"),
    ("game.gameOver", "游戏结束"),
    ("game.finalScore", "最终得分"),
    ("game.timeRemaining", "剩余时间"),
    ("game.correctAnswers", "正确答案"),
    ("game.seconds", "秒"),
    ("game.playAgain", "再玩一次"),
    ("game.backToMenu", "返回菜单"),
    ("game.analysisTitle", "AI算命分析"),
    ("game.analysisExample1", "根据你的游戏表现，你具有较强的逻辑思维能力。"),
    ("game.analysisExample2", "你的决策速度较快，属于果断型性格。"),
    ("game.analysisExample3", "建议你在生活中保持这种积极的态度，相信会有更好的运气。"),
    // 设置
    ("settings.title", "设置"),
    ("settings.theme", "主题"),
    ("settings.darkMode", "深色模式"),
    ("settings.language", "语言"),
    ("settings.notifications", "通知"),
    ("settings.receiveNotifications", "接收通知"),
    ("settings.api", "API配置"),
    ("settings.apiUrl", "API地址"),
    ("settings.about", "关于"),
    ("settings.version", "Soulbit v1.0.0"),
    ("settings.description", "基于现代Web技术构建的智能助手"),
    ("settings.copyright", "© 2026 Soulbit Team"),
    // 聊天
    ("chat.title", "聊天"),
    ("chat.inputPlaceholder", "输入消息..."),
    ("chat.send", "发送"),
    ("chat.connectionStatus", "连接状态"),
    ("chat.connected", "已连接"),
    ("chat.disconnected", "已断开"),
    ("chat.connecting", "连接中..."),
    ("chat.loading", "正在思考中..."),
    ("chat.serviceStatus", "在吗"),
    ("chat.connectionFailed", "连接失败"),
    ("chat.errorConnection", "WebSocket连接错误"),
    ("chat.errorNotConnected", "WebSocket未连接，请稍候重试"),
    ("chat.errorParse", "消息解析错误"),
    ("chat.errorBusy", "上一条消息还在处理中"),
    // 日历
    ("calendar.title", "日历"),
    ("calendar.today", "今天"),
    ("calendar.favorable", "宜"),
    ("calendar.unfavorable", "忌"),
    ("calendar.loading", "加载中..."),
    ("calendar.day.0", "日"),
    ("calendar.day.1", "一"),
    ("calendar.day.2", "二"),
    ("calendar.day.3", "三"),
    ("calendar.day.4", "四"),
    ("calendar.day.5", "五"),
    ("calendar.day.6", "六"),
];

const ZH_TW: &[(&str, &str)] = &[
    // 導航
    ("nav.chat", "聊天"),
    ("nav.calendar", "日曆"),
    ("nav.game", "遊戲"),
    ("nav.settings", "設置"),
    // 遊戲
    ("game.title", "AI算命小遊戲"),
    ("game.description", "結合中國傳統命理文化與現代AI技術的互動小遊戲"),
    ("game.fiveElements", "五行匹配遊戲"),
    ("game.fiveElementsDesc", "測試你對五行相生相克的了解程度"),
    ("game.fortuneTelling", "AI算命"),
    ("game.fortuneTellingDesc", "獲取個性化的命理解讀"),
    ("game.startGame", "開始遊戲"),
    ("game.back", "返回"),
    ("game.score", "得分"),
    ("game.time", "時間"),
    ("game.round", "回合"),
    ("game.whatGenerates", "{{element}}生什麼？"),
    ("game.whatConquers", "{{element}}克什麼？"),
    ("game.correct", "回答正確！"),
    ("game.incorrect", "回答錯誤！"),
    ("game.gameOver", "遊戲結束"),
    ("game.finalScore", "最終得分"),
    ("game.timeRemaining", "剩餘時間"),
    ("game.correctAnswers", "正確答案"),
    ("game.seconds", "秒"),
    ("game.playAgain", "再玩一次"),
    ("game.backToMenu", "返回菜單"),
    ("game.analysisTitle", "AI算命分析"),
    ("game.analysisExample1", "根據你的遊戲表現，你具有較強的邏輯思維能力。"),
    ("game.analysisExample2", "你的決策速度較快，屬於果斷型性格。"),
    ("game.analysisExample3", "建議你在生活中保持這種積極的態度，相信會有更好的運氣。"),
    // 設置
    ("settings.title", "設置"),
    ("settings.theme", "主題"),
    ("settings.darkMode", "深色模式"),
    ("settings.language", "語言"),
    ("settings.notifications", "通知"),
    ("settings.receiveNotifications", "接收通知"),
    ("settings.api", "API配置"),
    ("settings.apiUrl", "API地址"),
    ("settings.about", "關於"),
    ("settings.version", "Soulbit v1.0.0"),
    ("settings.description", "基於現代Web技術構建的智能助手"),
    ("settings.copyright", "© 2026 Soulbit Team"),
    // 聊天
    ("chat.title", "聊天"),
    ("chat.inputPlaceholder", "輸入消息..."),
    ("chat.send", "發送"),
    ("chat.connectionStatus", "連接狀態"),
    ("chat.connected", "已連接"),
    ("chat.disconnected", "已斷開"),
    ("chat.connecting", "連接中..."),
    ("chat.loading", "正在思考中..."),
    ("chat.serviceStatus", "在嗎"),
    ("chat.connectionFailed", "連接失敗"),
    ("chat.errorConnection", "WebSocket連接錯誤"),
    ("chat.errorNotConnected", "WebSocket未連接，請稍候重試"),
    ("chat.errorParse", "消息解析錯誤"),
    ("chat.errorBusy", "上一條消息還在處理中"),
    // 日曆
    ("calendar.title", "日曆"),
    ("calendar.today", "今天"),
    ("calendar.favorable", "宜"),
    ("calendar.unfavorable", "忌"),
    ("calendar.loading", "加載中..."),
    ("calendar.day.0", "日"),
    ("calendar.day.1", "一"),
    ("calendar.day.2", "二"),
    ("calendar.day.3", "三"),
    ("calendar.day.4", "四"),
    ("calendar.day.5", "五"),
    ("calendar.day.6", "六"),
];

const EN_US: &[(&str, &str)] = &[
    // navigation
    ("nav.chat", "Chat"),
    ("nav.calendar", "Calendar"),
    ("nav.game", "Game"),
    ("nav.settings", "Settings"),
    // game
    ("game.title", "AI Fortune Telling Game"),
    (
        "game.description",
        "An interactive game combining traditional Chinese numerology culture with modern AI technology",
    ),
    ("game.fiveElements", "Five Elements Matching Game"),
    ("game.fiveElementsDesc", "Test your knowledge of the Five Elements theory"),
    ("game.fortuneTelling", "AI Fortune Telling"),
    ("game.fortuneTellingDesc", "Get personalized numerology interpretation"),
    ("game.startGame", "Start Game"),
    ("game.back", "Back"),
    ("game.score", "Score"),
    ("game.time", "Time"),
    ("game.round", "Round"),
    ("game.whatGenerates", "What does {{element}} generate?"),
    ("game.whatConquers", "What does {{element}} conquer?"),
    ("game.correct", "Correct!"),
    ("game.incorrect", "Incorrect!"),
    ("game.gameOver", "Game Over"),
    ("game.finalScore", "Final Score"),
    ("game.timeRemaining", "Time Remaining"),
    ("game.correctAnswers", "Correct Answers"),
    ("game.seconds", "seconds"),
    ("game.playAgain", "Play Again"),
    ("game.backToMenu", "Back to Menu"),
    ("game.analysisTitle", "AI Fortune Analysis"),
    (
        "game.analysisExample1",
        "Based on your game performance, you have strong logical thinking skills.",
    ),
    (
        "game.analysisExample2",
        "Your decision-making speed is fast, indicating a decisive personality.",
    ),
    (
        "game.analysisExample3",
        "It is suggested that you maintain this positive attitude in life, which will bring you better luck.",
    ),
    // settings
    ("settings.title", "Settings"),
    ("settings.theme", "Theme"),
    ("settings.darkMode", "Dark Mode"),
    ("settings.language", "Language"),
    ("settings.notifications", "Notifications"),
    ("settings.receiveNotifications", "Receive Notifications"),
    ("settings.api", "API Configuration"),
    ("settings.apiUrl", "API URL"),
    ("settings.about", "About"),
    ("settings.version", "Soulbit v1.0.0"),
    ("settings.description", "Intelligent assistant built with modern web technologies"),
    ("settings.copyright", "© 2026 Soulbit Team"),
    // chat
    ("chat.title", "Chat"),
    ("chat.inputPlaceholder", "Type a message..."),
    ("chat.send", "Send"),
    ("chat.connectionStatus", "Connection Status"),
    ("chat.connected", "Connected"),
    ("chat.disconnected", "Disconnected"),
    ("chat.connecting", "Connecting..."),
    ("chat.loading", "Thinking..."),
    ("chat.serviceStatus", "Service"),
    ("chat.connectionFailed", "Connection failed"),
    ("chat.errorConnection", "WebSocket connection error"),
    ("chat.errorNotConnected", "WebSocket not connected, please retry shortly"),
    ("chat.errorParse", "Message parse error"),
    ("chat.errorBusy", "Still waiting for the previous reply"),
    // calendar
    ("calendar.title", "Calendar"),
    ("calendar.today", "Today"),
    ("calendar.favorable", "Favorable"),
    ("calendar.unfavorable", "Unfavorable"),
    ("calendar.loading", "Loading..."),
    ("calendar.day.0", "Sun"),
    ("calendar.day.1", "Mon"),
    ("calendar.day.2", "Tue"),
    ("calendar.day.3", "Wed"),
    ("calendar.day.4", "Thu"),
    ("calendar.day.5", "Fri"),
    ("calendar.day.6", "Sat"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hits_active_locale() {
        let t = Translator::new(Locale::EnUs);
        assert_eq!(t.t("nav.chat"), "Chat");
        let t = Translator::new(Locale::ZhCn);
        assert_eq!(t.t("nav.chat"), "聊天");
    }

    #[test]
    fn unknown_key_echoes_back() {
        let t = Translator::new(Locale::ZhCn);
        assert_eq!(t.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn variables_are_substituted_everywhere() {
        let t = Translator::new(Locale::EnUs);
        assert_eq!(
            t.t_with("game.whatGenerates", &[("element", "金")]),
            "What does 金 generate?"
        );
        let t = Translator::new(Locale::ZhCn);
        assert_eq!(t.t_with("game.whatConquers", &[("element", "水")]), "水克什么？");
    }

    #[test]
    fn tag_round_trip_and_fallback() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_tag(locale.as_tag()), locale);
        }
        assert_eq!(Locale::from_tag("fr-FR"), Locale::ZhCn);
    }
}
