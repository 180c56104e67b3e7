//! 도메인 타입: 시스템 전역에서 사용되는 공통 타입
//!
//! 트리아지 어휘(token → category)와 설정 파일이 공유하는 분류 체계를 정의합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 보안 이벤트 분류
///
/// 관련성 어휘의 각 토큰은 정확히 하나의 분류에 속합니다.
/// 로그 라인 자체를 파싱하지 않으므로 분류는 키워드 존재 여부로만 추론됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    /// 일반 실패 (failed, failure)
    Failure,
    /// 애플리케이션/시스템 에러
    Error,
    /// 치명적 심각도
    Critical,
    /// 접근 거부
    Denial,
    /// 권한 없는 접근 시도
    UnauthorizedAccess,
    /// 권한 상승 (sudo 등)
    PrivilegeEscalation,
    /// 인증 관련 이벤트
    Authentication,
    /// 계정 잠금
    Lockout,
    /// 방화벽 규칙 변경/경보
    Firewall,
    /// 민감 파일 접근
    SensitiveAccess,
}

impl EventCategory {
    /// 모든 분류 (선언 순서)
    pub const ALL: [EventCategory; 10] = [
        Self::Failure,
        Self::Error,
        Self::Critical,
        Self::Denial,
        Self::UnauthorizedAccess,
        Self::PrivilegeEscalation,
        Self::Authentication,
        Self::Lockout,
        Self::Firewall,
        Self::SensitiveAccess,
    ];

    /// 설정 파일에서 사용하는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Failure => "failure",
            Self::Error => "error",
            Self::Critical => "critical",
            Self::Denial => "denial",
            Self::UnauthorizedAccess => "unauthorized_access",
            Self::PrivilegeEscalation => "privilege_escalation",
            Self::Authentication => "authentication",
            Self::Lockout => "lockout",
            Self::Firewall => "firewall",
            Self::SensitiveAccess => "sensitive_access",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lowered)
            .ok_or_else(|| format!("unknown event category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        value: EventCategory,
    }

    #[test]
    fn display_matches_serde_name() {
        for category in EventCategory::ALL {
            let src = format!("value = \"{category}\"");
            let parsed: Wrapper = toml::from_str(&src).unwrap();
            assert_eq!(parsed.value, category);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!(
            "Privilege_Escalation".parse::<EventCategory>().unwrap(),
            EventCategory::PrivilegeEscalation
        );
        assert_eq!(" lockout ".parse::<EventCategory>().unwrap(), EventCategory::Lockout);
    }

    #[test]
    fn from_str_rejects_unknown() {
        let err = "malware".parse::<EventCategory>().unwrap_err();
        assert!(err.contains("malware"));
    }
}
