use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MidashiLevel {
    Oh,   // 大見出し
    Naka, // 中見出し
    Ko,   // 小見出し
}

impl MidashiLevel {
    pub fn of(name: &str) -> Option<Self> {
        match name {
            "大" => Some(Self::Oh),
            "中" => Some(Self::Naka),
            "小" => Some(Self::Ko),
            _ => None,
        }
    }
}
