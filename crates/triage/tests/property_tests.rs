//! 트리아지 속성 기반 테스트
//!
//! - 재필터링 멱등성
//! - 마스킹 완전성 / 정밀성
//! - 입력 순서 보존
//! - 관련 없는 라인 제거
//! - 임의 입력에서 패닉 없음

use proptest::prelude::*;

use logwarden_triage::{Redactor, TriageFilter, Vocabulary, triage};

const SENSITIVE_KEYS: &[&str] = &["password", "passwd", "token", "key"];
const PLAIN_KEYS: &[&str] = &[
    "user", "cpu", "mem", "host", "port", "path", "pid", "status", "monkey", "keyboard",
    "tokenizer", "token_id",
];

/// 민감 키를 임의의 대소문자로 만듭니다.
fn sensitive_key() -> impl Strategy<Value = String> {
    (
        prop::sample::select(SENSITIVE_KEYS),
        prop::collection::vec(any::<bool>(), 8),
    )
        .prop_map(|(key, upper)| {
            key.chars()
                .zip(upper.iter().cycle())
                .map(|(c, up)| if *up { c.to_ascii_uppercase() } else { c })
                .collect()
        })
}

/// 실제 로그와 비슷한 라인 (관련/비관련, 할당 포함)
fn log_line() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec![
            "INFO", "WARN", "ERROR", "CRITICAL", "DEBUG", "denied", "Failed", "sudo",
        ]),
        "[a-z ]{0,20}",
        prop::option::of((sensitive_key(), "[A-Za-z0-9!@#%^&*]{1,12}")),
        prop::option::of((prop::sample::select(PLAIN_KEYS), "[a-z0-9%/.]{1,10}")),
    )
        .prop_map(|(level, words, secret, plain)| {
            let mut line = format!("{level}: {words}");
            if let Some((key, value)) = plain {
                line.push_str(&format!(" {key}={value}"));
            }
            if let Some((key, value)) = secret {
                line.push_str(&format!(" {key}={value}"));
            }
            line
        })
}

/// 모음이 없으므로 어떤 기본 어휘 토큰도 만들 수 없는 텍스트
fn vowelless_text() -> impl Strategy<Value = String> {
    "[b-df-hj-np-tv-zB-DF-HJ-NP-TV-Z0-9 =:%._\n-]{0,200}"
}

proptest! {
    #[test]
    fn filtering_is_idempotent(lines in prop::collection::vec(log_line(), 0..30)) {
        let raw = lines.join("\n");
        let once = triage(&raw);
        let twice = triage(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filtering_arbitrary_text_is_idempotent(raw in any::<String>()) {
        let once = triage(&raw);
        prop_assert_eq!(triage(&once), once);
    }

    #[test]
    fn arbitrary_input_does_not_panic(raw in any::<String>()) {
        let result = TriageFilter::default().apply(&raw);
        let stats = result.stats;
        prop_assert_eq!(stats.kept_lines + stats.dropped_lines, stats.total_lines);
    }

    #[test]
    fn every_output_line_is_relevant(raw in any::<String>()) {
        let vocab = Vocabulary::default();
        for line in triage(&raw).lines() {
            prop_assert!(vocab.is_relevant(line), "irrelevant line kept: {:?}", line);
        }
    }

    #[test]
    fn sensitive_values_are_always_redacted(
        prefix in "[a-z ]{0,20}",
        key in sensitive_key(),
        value in "[A-Za-z0-9!@#%^&*]{1,12}",
        suffix in "[a-z ]{0,20}",
    ) {
        let line = format!("ERROR {prefix} {key}={value} {suffix}");
        let out = Redactor::default().redact(&line).into_owned();
        let original_pair = format!("{key}={value}");
        let redacted_pair = format!("{key}=[REDACTED]");
        prop_assert!(!out.contains(&original_pair));
        prop_assert!(out.contains(&redacted_pair));
    }

    #[test]
    fn colon_separated_values_are_redacted(
        key in sensitive_key(),
        blanks in "[ \t]{0,3}",
        value in "[A-Za-z0-9!@#%^&*]{1,12}",
        suffix in "[a-z ]{0,20}",
    ) {
        let line = format!("ERROR {key}:{blanks}{value} {suffix}");
        let out = triage(&line);
        prop_assert_eq!(out, format!("ERROR {key}:{blanks}[REDACTED] {suffix}"));
    }

    #[test]
    fn spaced_json_values_are_redacted(
        key in sensitive_key(),
        value in "[A-Za-z0-9 !@#%^&*]{1,16}",
    ) {
        let line = format!(r#"ERROR payload {{"user": "bob", "{key}": "{value}"}}"#);
        let out = triage(&line);
        prop_assert_eq!(
            out,
            format!(r#"ERROR payload {{"user": "bob", "{key}": "[REDACTED]"}}"#)
        );
    }

    #[test]
    fn two_sensitive_values_are_redacted_independently(
        first in sensitive_key(),
        second in sensitive_key(),
        a in "[A-Za-z0-9]{1,8}",
        b in "[A-Za-z0-9]{1,8}",
    ) {
        let line = format!("ERROR {first}={a} {second}={b}");
        let out = triage(&line);
        prop_assert_eq!(out, format!("ERROR {first}=[REDACTED] {second}=[REDACTED]"));
    }

    #[test]
    fn non_sensitive_pairs_are_untouched(
        pairs in prop::collection::vec(
            (prop::sample::select(PLAIN_KEYS), "[a-z0-9%/.]{1,10}"),
            0..6,
        ),
    ) {
        let mut line = String::from("ERROR:");
        for (key, value) in &pairs {
            line.push_str(&format!(" {key}={value}"));
        }
        let redacted = Redactor::default().redact(&line);
        prop_assert_eq!(&*redacted, line.as_str());
        prop_assert_eq!(triage(&line), line);
    }

    #[test]
    fn surviving_lines_keep_input_order(flags in prop::collection::vec(any::<bool>(), 0..50)) {
        let raw: Vec<String> = flags
            .iter()
            .enumerate()
            .map(|(i, relevant)| {
                if *relevant {
                    format!("ERROR event {i}")
                } else {
                    format!("INFO event {i}")
                }
            })
            .collect();
        let expected: Vec<String> = raw
            .iter()
            .filter(|line| line.starts_with("ERROR"))
            .cloned()
            .collect();

        prop_assert_eq!(triage(&raw.join("\n")), expected.join("\n"));
    }

    #[test]
    fn lines_without_vocabulary_tokens_are_dropped(raw in vowelless_text()) {
        let result = TriageFilter::default().apply(&raw);
        prop_assert!(result.is_empty());
        prop_assert_eq!(result.to_text(), "");
    }
}

#[test]
fn spec_examples() {
    assert_eq!(
        triage("2024-01-01 ERROR: login failed user=admin password=Secr3t!"),
        "2024-01-01 ERROR: login failed user=admin password=[REDACTED]"
    );
    assert_eq!(triage("2024-01-01 INFO: health check cpu=12% mem=30%"), "");
    assert_eq!(
        triage("ERROR token=AAA key=BBB"),
        "ERROR token=[REDACTED] key=[REDACTED]"
    );
}

#[test]
fn empty_blob_yields_empty_text() {
    assert_eq!(triage(""), "");
    assert!(TriageFilter::default().apply("\n\n\n").is_empty());
}
