//! 원료 kg 단가와 사출기 톤수별 임률을 담는 마스터 데이터.
//! 내장 값은 샘플이며 실제 견적에는 회사 단가표(TOML)를 불러와야 한다.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// 원료 단가 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRate {
    /// 원료 전체 표기(예: "ABS SD0170")
    pub name: String,
    /// 원료 단가 [원/kg]
    pub price_per_kg: f64,
}

/// 사출기 톤수별 임률 레코드.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectionRate {
    /// 톤수 표기(예: "150")
    pub tonnage: String,
    /// 임률 [원/h]
    pub rate_per_hour: f64,
}

/// 이름/톤수로 단가를 찾는 조회 계약. 대소문자를 구분하는 정확 일치만 허용한다.
pub trait RateLookup {
    fn find_material_rate(&self, name: &str) -> Option<&MaterialRate>;
    fn find_injection_rate(&self, tonnage: &str) -> Option<&InjectionRate>;
}

/// 마스터 데이터 로드 중 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum MasterDataError {
    #[error("마스터 데이터 파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("마스터 데이터 파싱 오류: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("중복된 원료명: {0}")]
    DuplicateMaterial(String),
    #[error("중복된 톤수: {0}")]
    DuplicateTonnage(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    #[serde(default)]
    pub materials: Vec<MaterialRate>,
    #[serde(default)]
    pub injection_rates: Vec<InjectionRate>,
}

impl MasterData {
    /// 파일 없이도 동작하도록 포함한 샘플 단가표.
    pub fn built_in() -> Self {
        Self {
            materials: BUILT_IN_MATERIALS
                .iter()
                .map(|(name, price)| MaterialRate {
                    name: (*name).to_string(),
                    price_per_kg: *price,
                })
                .collect(),
            injection_rates: BUILT_IN_INJECTION_RATES
                .iter()
                .map(|(tonnage, rate)| InjectionRate {
                    tonnage: (*tonnage).to_string(),
                    rate_per_hour: *rate,
                })
                .collect(),
        }
    }

    /// TOML 문자열에서 단가표를 읽는다. 같은 키가 두 번 나오면 오류로 본다.
    pub fn from_toml_str(src: &str) -> Result<Self, MasterDataError> {
        let data: MasterData = toml::from_str(src)?;
        data.check_duplicates()?;
        Ok(data)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MasterDataError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 경로가 주어지면 파일을, 없으면 내장 샘플을 사용한다.
    pub fn load_or_built_in(path: Option<&str>) -> Result<Self, MasterDataError> {
        match path {
            Some(p) if !p.trim().is_empty() => Self::load(p),
            _ => Ok(Self::built_in()),
        }
    }

    pub fn material_names(&self) -> Vec<&str> {
        self.materials.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn tonnages(&self) -> Vec<&str> {
        self.injection_rates.iter().map(|r| r.tonnage.as_str()).collect()
    }

    fn check_duplicates(&self) -> Result<(), MasterDataError> {
        let mut seen = HashSet::new();
        for m in &self.materials {
            if !seen.insert(m.name.as_str()) {
                return Err(MasterDataError::DuplicateMaterial(m.name.clone()));
            }
        }
        let mut seen = HashSet::new();
        for r in &self.injection_rates {
            if !seen.insert(r.tonnage.as_str()) {
                return Err(MasterDataError::DuplicateTonnage(r.tonnage.clone()));
            }
        }
        Ok(())
    }
}

impl RateLookup for MasterData {
    fn find_material_rate(&self, name: &str) -> Option<&MaterialRate> {
        self.materials.iter().find(|m| m.name == name)
    }

    fn find_injection_rate(&self, tonnage: &str) -> Option<&InjectionRate> {
        self.injection_rates.iter().find(|r| r.tonnage == tonnage)
    }
}

/// 계산기 호출 전에 조회를 끝낸 단가 묶음.
#[derive(Debug, Clone, Default)]
pub struct ResolvedRates {
    pub material: Option<MaterialRate>,
    pub injection: Option<InjectionRate>,
}

/// 원료명/톤수로 단가를 조회한다.
///
/// 찾지 못하면 `None`을 담아 돌려주고, 계산기는 해당 단가를 0으로 본다.
/// 이름이 입력됐는데 일치하는 항목이 없으면 debug 로그를 남긴다. 입력마다 호출되므로
/// 사용자에게 알리는 것은 화면 쪽 몫이다.
pub fn resolve_rates(
    lookup: &impl RateLookup,
    material_name: &str,
    tonnage: &str,
) -> ResolvedRates {
    let material = lookup.find_material_rate(material_name).cloned();
    if material.is_none() && !material_name.is_empty() {
        tracing::debug!(material = material_name, "원료 단가를 찾지 못해 0으로 계산합니다");
    }
    let injection = lookup.find_injection_rate(tonnage).cloned();
    if injection.is_none() && !tonnage.is_empty() {
        tracing::debug!(tonnage, "톤수 임률을 찾지 못해 0으로 계산합니다");
    }
    ResolvedRates {
        material,
        injection,
    }
}

impl ResolvedRates {
    /// 이름/톤수가 입력됐는데 단가를 찾지 못한 항목이 있는지.
    pub fn missing(&self, material_name: &str, tonnage: &str) -> bool {
        (self.material.is_none() && !material_name.is_empty())
            || (self.injection.is_none() && !tonnage.is_empty())
    }
}

const BUILT_IN_MATERIALS: &[(&str, f64)] = &[
    ("ABS SD0170", 2_000.0),
    ("ABS HI121H", 2_300.0),
    ("PP J-560S", 1_600.0),
    ("PETG S2008", 2_900.0),
    ("SAN 310NTR", 2_100.0),
    ("PCTG DN011", 3_800.0),
    ("LDPE 5321", 1_750.0),
];

const BUILT_IN_INJECTION_RATES: &[(&str, f64)] = &[
    ("80", 350_000.0),
    ("110", 420_000.0),
    ("150", 500_000.0),
    ("220", 640_000.0),
    ("350", 850_000.0),
];
