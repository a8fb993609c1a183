//! HTTP 方法能力集合
//!
//! 将逗号分隔的方法字符串（如 `"get,POST, put"`）解析为规范化的能力标记。
//! GET 与 OPTIONS 归并为 `READABLE`，PUT 与 PATCH 归并为 `EDITABLE`。

use bitflags::bitflags;

bitflags! {
    /// 端点支持的方法能力
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodSet: u8 {
        /// GET / OPTIONS
        const READABLE = 0b0001;
        /// POST
        const CREATABLE = 0b0010;
        /// PUT / PATCH
        const EDITABLE = 0b0100;
        /// DELETE
        const DELETABLE = 0b1000;
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl MethodSet {
    /// 解析原始方法字符串
    ///
    /// 宽松解析：按逗号切分、去空白、转大写，无法识别的片段直接丢弃。
    /// 结果可能为空集合。
    pub fn parse(raw: &str) -> Self {
        raw.split(',')
            .map(|token| token.trim().to_uppercase())
            .filter_map(|token| Self::from_verb(&token))
            .fold(Self::empty(), |set, flag| set | flag)
    }

    /// 单个（已大写的）HTTP 动词对应的能力
    pub fn from_verb(verb: &str) -> Option<Self> {
        match verb {
            "GET" | "OPTIONS" => Some(Self::READABLE),
            "POST" => Some(Self::CREATABLE),
            "PUT" | "PATCH" => Some(Self::EDITABLE),
            "DELETE" => Some(Self::DELETABLE),
            _ => None,
        }
    }

    /// 展开为宿主路由需要挂载的具体动词
    pub fn verbs(&self) -> Vec<&'static str> {
        let mut verbs = Vec::new();
        if self.contains(Self::READABLE) {
            verbs.push("GET");
        }
        if self.contains(Self::CREATABLE) {
            verbs.push("POST");
        }
        if self.contains(Self::EDITABLE) {
            verbs.push("PUT");
            verbs.push("PATCH");
        }
        if self.contains(Self::DELETABLE) {
            verbs.push("DELETE");
        }
        verbs
    }
}

impl std::str::FromStr for MethodSet {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl std::fmt::Display for MethodSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verbs().join(", "))
    }
}
