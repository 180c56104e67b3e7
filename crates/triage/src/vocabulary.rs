//! 관련성 어휘 -- 토큰 → 분류 매핑
//!
//! [`Vocabulary`]는 감사자가 관심을 가지는 로그 라인을 고르는 닫힌 토큰 집합입니다.
//! 매칭은 라인의 대문자 사본에 대한 부분 문자열 검색이므로 대소문자를 구분하지 않습니다.
//!
//! # 기본 어휘
//! | 토큰 | 분류 |
//! |------|------|
//! | `FAIL` | failure |
//! | `ERROR` | error |
//! | `CRITICAL`, `FATAL` | critical |
//! | `DENIED`, `DENY`, `FORBIDDEN` | denial |
//! | `UNAUTHORIZED` | unauthorized_access |
//! | `SUDO`, `PRIVILEGE`, `ESCALAT` | privilege_escalation |
//! | `AUTHENTICATION` | authentication |
//! | `LOCKOUT`, `LOCKED OUT` | lockout |
//! | `FIREWALL` | firewall |
//! | `SENSITIVE_FILE` | sensitive_access |
//!
//! `LOGIN`은 성공한 로그인까지 모두 잡아내므로 기본 어휘에 넣지 않습니다.

use std::collections::BTreeMap;

use logwarden_core::types::EventCategory;

const DEFAULT_TOKENS: &[(&str, EventCategory)] = &[
    ("FAIL", EventCategory::Failure),
    ("ERROR", EventCategory::Error),
    ("CRITICAL", EventCategory::Critical),
    ("FATAL", EventCategory::Critical),
    ("DENIED", EventCategory::Denial),
    ("DENY", EventCategory::Denial),
    ("FORBIDDEN", EventCategory::Denial),
    ("UNAUTHORIZED", EventCategory::UnauthorizedAccess),
    ("SUDO", EventCategory::PrivilegeEscalation),
    ("PRIVILEGE", EventCategory::PrivilegeEscalation),
    ("ESCALAT", EventCategory::PrivilegeEscalation),
    ("AUTHENTICATION", EventCategory::Authentication),
    ("LOCKOUT", EventCategory::Lockout),
    ("LOCKED OUT", EventCategory::Lockout),
    ("FIREWALL", EventCategory::Firewall),
    ("SENSITIVE_FILE", EventCategory::SensitiveAccess),
];

/// 관련성 어휘
///
/// 토큰은 삽입 시 대문자로 정규화되며 삽입 순서를 유지합니다.
/// 같은 토큰을 다시 넣으면 분류만 갱신됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    entries: Vec<(String, EventCategory)>,
}

impl Vocabulary {
    /// 빈 어휘를 생성합니다. 빈 어휘는 어떤 라인도 통과시키지 않습니다.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// (토큰, 분류) 쌍에서 어휘를 생성합니다.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, EventCategory)>,
        S: AsRef<str>,
    {
        let mut vocabulary = Self::empty();
        vocabulary.extend(entries);
        vocabulary
    }

    /// 토큰을 추가하거나 기존 토큰의 분류를 갱신합니다.
    ///
    /// 공백만 있는 토큰은 모든 라인에 매칭되므로 무시합니다.
    pub fn insert(&mut self, token: &str, category: EventCategory) {
        let token = token.trim().to_uppercase();
        if token.is_empty() {
            return;
        }
        match self.entries.iter_mut().find(|(t, _)| *t == token) {
            Some(entry) => entry.1 = category,
            None => self.entries.push((token, category)),
        }
    }

    /// 여러 토큰을 추가합니다.
    pub fn extend<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (S, EventCategory)>,
        S: AsRef<str>,
    {
        for (token, category) in entries {
            self.insert(token.as_ref(), category);
        }
    }

    /// 설정의 어휘 맵을 적용한 어휘를 만듭니다.
    pub fn with_overrides(
        extra: &BTreeMap<String, EventCategory>,
        replace_defaults: bool,
    ) -> Self {
        let mut vocabulary = if replace_defaults {
            Self::empty()
        } else {
            Self::default()
        };
        vocabulary.extend(extra.iter().map(|(t, c)| (t.as_str(), *c)));
        vocabulary
    }

    /// 라인에 매칭되는 분류를 반환합니다 (중복 제거, 어휘 순서).
    ///
    /// 빈 벡터는 라인이 관련 없음을 뜻합니다.
    pub fn classify(&self, line: &str) -> Vec<EventCategory> {
        let upper = line.to_uppercase();
        let mut categories = Vec::new();
        for (token, category) in &self.entries {
            if upper.contains(token.as_str()) && !categories.contains(category) {
                categories.push(*category);
            }
        }
        categories
    }

    /// 라인이 관련성 술어를 만족하는지 확인합니다.
    pub fn is_relevant(&self, line: &str) -> bool {
        let upper = line.to_uppercase();
        self.entries
            .iter()
            .any(|(token, _)| upper.contains(token.as_str()))
    }

    /// 등록된 (토큰, 분류) 목록
    pub fn entries(&self) -> impl Iterator<Item = (&str, EventCategory)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    /// 토큰 수
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_entries(DEFAULT_TOKENS.iter().copied())
    }
}
