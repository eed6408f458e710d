use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Body sent to the analysis endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub user_id: String,
    pub top_n: usize,
}

impl AnalysisRequest {
    pub fn new(user_id: impl Into<String>, top_n: usize) -> Self {
        Self {
            user_id: user_id.into(),
            top_n,
        }
    }
}

/// A single job listing as returned by the data source. Only `job_id` is guaranteed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobOpportunity {
    #[serde(deserialize_with = "deserialize_job_id")]
    pub job_id: String,
    #[serde(default)]
    pub job_role: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub avg_salary: Option<f64>,
    #[serde(default)]
    pub min_salary: Option<f64>,
    #[serde(default)]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub similarity_score: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub matching_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub missing_skills: Vec<String>,
}

impl JobOpportunity {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            job_role: None,
            company: None,
            avg_salary: None,
            min_salary: None,
            max_salary: None,
            similarity_score: None,
            matching_skills: Vec::new(),
            missing_skills: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: &str, company: &str) -> Self {
        self.job_role = Some(role.to_string());
        self.company = Some(company.to_string());
        self
    }

    pub fn with_salary(mut self, min: f64, avg: f64, max: f64) -> Self {
        self.min_salary = Some(min);
        self.avg_salary = Some(avg);
        self.max_salary = Some(max);
        self
    }

    pub fn with_similarity(mut self, score: f64) -> Self {
        self.similarity_score = Some(score);
        self
    }

    pub fn with_missing(mut self, skills: &[&str]) -> Self {
        self.missing_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_matching(mut self, skills: &[&str]) -> Self {
        self.matching_skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn is_missing(&self, skill: &str) -> bool {
        self.missing_skills.iter().any(|s| s == skill)
    }

    /// Salary used in means. Absent amounts count as zero.
    pub fn salary_or_zero(&self) -> f64 {
        self.avg_salary.unwrap_or(0.0)
    }
}

/// The unit of input to both downstream computations. `top_opportunities` is
/// rank-ordered by the data source and never re-ranked here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SkillGapResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_skills: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_opportunities: Vec<JobOpportunity>,
    #[serde(default, deserialize_with = "deserialize_job_count")]
    pub total_jobs_analyzed: u64,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResponseValidationError {
    #[error("opportunity at rank {0} has a blank job_id")]
    BlankJobId(usize),
}

impl SkillGapResponse {
    /// Only `job_id` is guaranteed by the source. Every other field is taken as sent.
    pub fn validate(&self) -> Result<(), ResponseValidationError> {
        for (rank, opp) in self.top_opportunities.iter().enumerate() {
            if opp.job_id.trim().is_empty() {
                return Err(ResponseValidationError::BlankJobId(rank + 1));
            }
        }
        Ok(())
    }

    /// User skills as a set; the source does not guarantee uniqueness.
    pub fn user_skill_set(&self) -> BTreeSet<&str> {
        self.user_skills.iter().map(String::as_str).collect()
    }

    /// Keeps the first `top_n` opportunities. Zero keeps everything.
    pub fn truncated(mut self, top_n: usize) -> Self {
        if top_n > 0 {
            self.top_opportunities.truncate(top_n);
        }
        self
    }
}

fn deserialize_job_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct JobIdVisitor;

    impl<'de> Visitor<'de> for JobIdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or integer job id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(JobIdVisitor)
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Job counts arrive as integers, floats or null depending on the source.
fn deserialize_job_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    struct JobCountVisitor;

    impl<'de> Visitor<'de> for JobCountVisitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a non-negative job count")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(v.max(0) as u64)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            if v.is_finite() && v > 0.0 {
                Ok(v.round() as u64)
            } else {
                Ok(0)
            }
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(0)
        }
    }

    deserializer.deserialize_any(JobCountVisitor)
}
