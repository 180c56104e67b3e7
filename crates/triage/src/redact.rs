//! 민감 값 마스킹 -- `key=value` 할당의 값 부분만 대체
//!
//! [`Redactor`]는 민감 키 뒤의 값을 고정 문자열(sentinel)로 바꿉니다.
//! 키 이름과 구분자는 원본 바이트 그대로 유지됩니다.
//!
//! # 매칭 규칙
//! - 키: ASCII 식별자 문자(`A-Z a-z 0-9 _ . -`)의 최대 연속 구간.
//!   키 전체 또는 `_`, `-`, `.`로 나눈 마지막 세그먼트가 민감 키와 같으면(대소문자 무시) 대상입니다.
//!   `api_key`, `db.password`, `X-Auth-Token`은 대상이고 `monkey`, `token_id`는 아닙니다.
//! - 구분자: `=` 또는 `:` (키 뒤에 닫는 따옴표가 하나 올 수 있음, 예: `"password":"x"`)
//!   `:` 뒤의 공백/탭은 건너뜁니다(`password: x`, `"password": "x"`). `=`는 바로 뒤에 값이 와야 합니다.
//! - 값: 따옴표로 감싼 문자열이면 따옴표 안쪽, 아니면 다음 공백 전까지의 구간

use std::borrow::Cow;

use regex::Regex;

/// 기본 대체 문자열
pub const DEFAULT_SENTINEL: &str = "[REDACTED]";

/// 기본 민감 키
pub const DEFAULT_SENSITIVE_KEYS: &[&str] = &["password", "passwd", "token", "key"];

/// 민감 값 마스커
#[derive(Debug, Clone)]
pub struct Redactor {
    /// 소문자로 정규화된 민감 키
    keys: Vec<String>,
    sentinel: String,
    /// 키 + (선택적 닫는 따옴표) + 구분자
    assignment: Regex,
}

/// 한 라인의 마스킹 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redacted<'a> {
    /// 마스킹된 텍스트 (변경이 없으면 원본을 빌림)
    pub text: Cow<'a, str>,
    /// 대체된 값의 개수
    pub count: usize,
}

impl Redactor {
    /// 민감 키 목록과 대체 문자열로 마스커를 생성합니다.
    pub fn new<I, S>(keys: I, sentinel: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for key in keys {
            let key = key.as_ref().trim().to_ascii_lowercase();
            if !key.is_empty() && !normalized.contains(&key) {
                normalized.push(key);
            }
        }
        Self {
            keys: normalized,
            sentinel: sentinel.into(),
            assignment: assignment_regex(),
        }
    }

    /// 대체 문자열
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    /// 정규화된 민감 키 목록
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// 라인의 모든 민감 값을 대체합니다.
    pub fn redact<'a>(&self, line: &'a str) -> Cow<'a, str> {
        self.redact_counted(line).text
    }

    /// 라인의 모든 민감 값을 대체하고 대체 횟수를 함께 반환합니다.
    pub fn redact_counted<'a>(&self, line: &'a str) -> Redacted<'a> {
        let mut out: Option<String> = None;
        let mut copied_to = 0;
        let mut count = 0;
        let mut pos = 0;

        while let Some(caps) = self.assignment.captures_at(line, pos) {
            let (Some(whole), Some(key)) = (caps.get(0), caps.name("key")) else {
                break;
            };
            pos = whole.end();

            if !self.is_sensitive_key(key.as_str()) {
                continue;
            }
            let from = if whole.as_str().ends_with(':') {
                skip_blanks(line, whole.end())
            } else {
                whole.end()
            };
            let Some((start, end)) = value_span(line, from) else {
                continue;
            };
            // 값 안쪽은 다시 검사하지 않음
            pos = end;

            if &line[start..end] == self.sentinel {
                continue;
            }

            let buf = out.get_or_insert_with(|| String::with_capacity(line.len()));
            buf.push_str(&line[copied_to..start]);
            buf.push_str(&self.sentinel);
            copied_to = end;
            count += 1;
        }

        let text = match out {
            Some(mut buf) => {
                buf.push_str(&line[copied_to..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(line),
        };
        Redacted { text, count }
    }

    /// 키 전체 또는 마지막 세그먼트가 민감 키인지 확인합니다.
    fn is_sensitive_key(&self, key: &str) -> bool {
        let last = key.rsplit(['_', '-', '.']).next().unwrap_or(key);
        self.keys
            .iter()
            .any(|k| key.eq_ignore_ascii_case(k) || last.eq_ignore_ascii_case(k))
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(DEFAULT_SENSITIVE_KEYS.iter().copied(), DEFAULT_SENTINEL)
    }
}

fn assignment_regex() -> Regex {
    Regex::new(r#"(?P<key>[A-Za-z0-9_.\-]+)["']?[=:]"#)
        .expect("assignment pattern is a valid regex")
}

/// `from`부터 이어지는 공백/탭을 건너뛴 위치
fn skip_blanks(line: &str, from: usize) -> usize {
    let rest = &line[from..];
    from + (rest.len() - rest.trim_start_matches([' ', '\t']).len())
}

/// `from`에서 시작하는 값의 바이트 구간을 찾습니다.
///
/// 값이 비어 있으면(공백 또는 라인 끝) `None`을 반환합니다.
fn value_span(line: &str, from: usize) -> Option<(usize, usize)> {
    let rest = &line[from..];
    let first = rest.chars().next()?;
    if first.is_whitespace() {
        return None;
    }

    if first == '"' || first == '\'' {
        let inner = from + first.len_utf8();
        if let Some(close) = line[inner..].find(first) {
            return Some((inner, inner + close));
        }
    }

    let len = rest
        .char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    Some((from, from + len))
}
