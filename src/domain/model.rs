use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_AVERAGE_TRANSACTION_SIZE: u64 = 500;
pub const DEFAULT_MAX_TRANSACTION_SIZE: u64 = 5_000;
pub const DEFAULT_MONTHLY_TRANSACTION_VOLUME: u64 = 500_000;

const DEFAULT_CAPABILITIES: [&str; 4] = ["transfers", "send-funds", "collect-funds", "wallet"];

/// One business to onboard, as supplied by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    pub business_info: BusinessInfo,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub bank_account: Option<BankAccountInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInfo {
    pub legal_business_name: String,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub doing_business_as: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "taxID")]
    pub tax_id: Option<String>,
    #[serde(default)]
    pub industry_codes: Option<Value>,
    #[serde(default)]
    pub average_transaction_size: Option<u64>,
    #[serde(default)]
    pub max_transaction_size: Option<u64>,
    #[serde(default)]
    pub average_monthly_transaction_volume: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub birth_date: Option<Value>,
    #[serde(default, rename = "governmentID")]
    pub government_id: Option<Value>,
    #[serde(default)]
    pub responsibilities: Option<Responsibilities>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Responsibilities {
    #[serde(default)]
    pub is_controller: Option<bool>,
    #[serde(default)]
    pub is_owner: Option<bool>,
    #[serde(default)]
    pub ownership_percentage: Option<u32>,
    #[serde(default)]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountInput {
    pub account_number: String,
    pub routing_number: String,
    #[serde(default)]
    pub bank_account_type: Option<String>,
    #[serde(default)]
    pub holder_name: Option<String>,
    #[serde(default)]
    pub holder_type: Option<String>,
}

/// Legal structures Moov accepts for a business profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusinessType {
    Llc,
    SoleProprietorship,
    Partnership,
    Trust,
    PublicCorporation,
    PrivateCorporation,
    UnincorporatedAssociation,
    UnincorporatedNonProfit,
}

impl BusinessType {
    /// Maps caller free text onto the closed set above. Unrecognized input
    /// and missing input both land on `Llc`.
    pub fn normalize(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return BusinessType::Llc;
        };

        match raw.trim().to_lowercase().as_str() {
            "llc" => BusinessType::Llc,
            "corporation" | "corp" | "inc" | "incorporated" | "privatecorporation" => {
                BusinessType::PrivateCorporation
            }
            "publiccorporation" => BusinessType::PublicCorporation,
            "partnership" => BusinessType::Partnership,
            "soleproprietorship" | "sole proprietorship" => BusinessType::SoleProprietorship,
            "unincorporatedassociation" => BusinessType::UnincorporatedAssociation,
            "trust" => BusinessType::Trust,
            "nonprofit" | "unincorporatednonprofit" => BusinessType::UnincorporatedNonProfit,
            _ => BusinessType::Llc,
        }
    }
}

// --- Outbound Moov payloads -------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountPayload {
    pub account_type: String,
    pub profile: ProfilePayload,
    pub capabilities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePayload {
    pub business: BusinessProfilePayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfilePayload {
    pub legal_business_name: String,
    pub business_type: BusinessType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doing_business_as: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "taxID", skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<TaxIdPayload>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_codes: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaxIdPayload {
    pub ein: EinPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct EinPayload {
    pub number: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativePayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,
    pub birth_date_provided: bool,
    #[serde(rename = "governmentIDProvided")]
    pub government_id_provided: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<Value>,
    #[serde(rename = "governmentID", skip_serializing_if = "Option::is_none")]
    pub government_id: Option<Value>,
    pub responsibilities: ResponsibilitiesPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsibilitiesPayload {
    pub is_controller: bool,
    pub is_owner: bool,
    pub ownership_percentage: u32,
    pub job_title: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnderwritingPayload {
    pub average_transaction_size: u64,
    pub max_transaction_size: u64,
    pub average_monthly_transaction_volume: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankAccountPayload {
    pub account: BankAccountDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccountDetails {
    pub account_number: String,
    pub routing_number: String,
    pub bank_account_type: String,
    pub holder_name: String,
    pub holder_type: String,
}

/// Operator with every default already applied, so pipeline steps never
/// re-derive optional fields.
#[derive(Debug, Clone)]
pub struct NormalizedOperator {
    pub legal_name: String,
    pub account: CreateAccountPayload,
    pub representative: Option<RepresentativePayload>,
    pub underwriting: UnderwritingPayload,
    pub bank_account: Option<BankAccountPayload>,
}

impl NormalizedOperator {
    pub fn from_operator(operator: Operator) -> Self {
        let Operator {
            business_info,
            contact,
            bank_account,
        } = operator;

        let legal_name = business_info.legal_business_name.clone();

        let account = CreateAccountPayload {
            account_type: "business".to_string(),
            profile: ProfilePayload {
                business: BusinessProfilePayload {
                    legal_business_name: business_info.legal_business_name.clone(),
                    business_type: BusinessType::normalize(business_info.business_type.as_deref()),
                    website: business_info.website,
                    email: business_info.email,
                    phone: business_info.phone,
                    address: business_info.address,
                    doing_business_as: business_info.doing_business_as,
                    description: business_info.description,
                    tax_id: business_info.tax_id.map(|number| TaxIdPayload {
                        ein: EinPayload { number },
                    }),
                    industry_codes: business_info.industry_codes,
                },
            },
            capabilities: DEFAULT_CAPABILITIES.iter().map(|c| c.to_string()).collect(),
        };

        let representative = contact.map(|contact| {
            let responsibilities = contact.responsibilities.unwrap_or(Responsibilities {
                is_controller: None,
                is_owner: None,
                ownership_percentage: None,
                job_title: None,
            });

            RepresentativePayload {
                name: contact.name,
                phone: contact.phone,
                email: contact.email,
                address: contact.address,
                birth_date_provided: true,
                government_id_provided: true,
                birth_date: contact.birth_date,
                government_id: contact.government_id,
                responsibilities: ResponsibilitiesPayload {
                    is_controller: responsibilities.is_controller.unwrap_or(true),
                    is_owner: responsibilities.is_owner.unwrap_or(true),
                    ownership_percentage: responsibilities.ownership_percentage.unwrap_or(100),
                    job_title: responsibilities
                        .job_title
                        .unwrap_or_else(|| "Owner".to_string()),
                },
            }
        });

        let underwriting = UnderwritingPayload {
            average_transaction_size: business_info
                .average_transaction_size
                .unwrap_or(DEFAULT_AVERAGE_TRANSACTION_SIZE),
            max_transaction_size: business_info
                .max_transaction_size
                .unwrap_or(DEFAULT_MAX_TRANSACTION_SIZE),
            average_monthly_transaction_volume: business_info
                .average_monthly_transaction_volume
                .unwrap_or(DEFAULT_MONTHLY_TRANSACTION_VOLUME),
        };

        let bank_account = bank_account.map(|bank| BankAccountPayload {
            account: BankAccountDetails {
                account_number: bank.account_number,
                routing_number: bank.routing_number,
                bank_account_type: bank
                    .bank_account_type
                    .unwrap_or_else(|| "checking".to_string()),
                holder_name: bank.holder_name.unwrap_or_else(|| legal_name.clone()),
                holder_type: bank.holder_type.unwrap_or_else(|| "business".to_string()),
            },
        });

        Self {
            legal_name,
            account,
            representative,
            underwriting,
            bank_account,
        }
    }
}

// --- Batch outcome ----------------------------------------------------------

/// Pipeline stage names as reported in the batch error list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    CreateAccount,
    GetTosToken,
    AcceptTermsOfService,
    AddRepresentative,
    MarkOwnersProvided,
    UpdateUnderwriting,
    AddBankAccount,
    Timeout,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::CreateAccount => "create_account",
            Step::GetTosToken => "get_tos_token",
            Step::AcceptTermsOfService => "accept_terms_of_service",
            Step::AddRepresentative => "add_representative",
            Step::MarkOwnersProvided => "mark_owners_provided",
            Step::UpdateUnderwriting => "update_underwriting",
            Step::AddBankAccount => "add_bank_account",
            Step::Timeout => "timeout",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepFailure {
    pub operator: String,
    #[serde(rename = "accountID", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    pub step: Step,
    pub error: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAccount {
    pub operator_name: String,
    #[serde(rename = "accountID")]
    pub account_id: String,
    pub moov_account: Value,
    pub access_token: String,
}

/// Accumulated result of one onboarding batch. Returned as a value; provider
/// rejections live in `errors`, never raised.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OnboardingOutcome {
    pub accounts: Vec<CreatedAccount>,
    pub errors: Vec<StepFailure>,
}

impl OnboardingOutcome {
    /// A batch counts as successful when at least one entity was created.
    pub fn succeeded(&self) -> bool {
        !self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_operator(name: &str) -> Operator {
        Operator {
            business_info: BusinessInfo {
                legal_business_name: name.to_string(),
                business_type: None,
                website: None,
                email: None,
                phone: None,
                address: None,
                doing_business_as: None,
                description: None,
                tax_id: None,
                industry_codes: None,
                average_transaction_size: None,
                max_transaction_size: None,
                average_monthly_transaction_volume: None,
            },
            contact: None,
            bank_account: None,
        }
    }

    #[test]
    fn test_business_type_normalization_variants() {
        for raw in ["Corp", "corporation", "INC", "incorporated", "privateCorporation"] {
            assert_eq!(
                BusinessType::normalize(Some(raw)),
                BusinessType::PrivateCorporation,
                "input: {raw}"
            );
        }
        assert_eq!(
            BusinessType::normalize(Some("sole proprietorship")),
            BusinessType::SoleProprietorship
        );
        assert_eq!(
            BusinessType::normalize(Some("nonprofit")),
            BusinessType::UnincorporatedNonProfit
        );
    }

    #[test]
    fn test_business_type_unrecognized_matches_missing() {
        assert_eq!(
            BusinessType::normalize(Some("galactic empire")),
            BusinessType::normalize(None)
        );
        assert_eq!(BusinessType::normalize(None), BusinessType::Llc);
    }

    #[test]
    fn test_business_type_wire_format() {
        assert_eq!(
            serde_json::to_value(BusinessType::PrivateCorporation).unwrap(),
            json!("privateCorporation")
        );
        assert_eq!(serde_json::to_value(BusinessType::Llc).unwrap(), json!("llc"));
    }

    #[test]
    fn test_underwriting_defaults() {
        let normalized = NormalizedOperator::from_operator(minimal_operator("Acme LLC"));

        assert_eq!(normalized.underwriting.average_transaction_size, 500);
        assert_eq!(normalized.underwriting.max_transaction_size, 5_000);
        assert_eq!(
            normalized.underwriting.average_monthly_transaction_volume,
            500_000
        );
    }

    #[test]
    fn test_representative_defaults() {
        let mut operator = minimal_operator("Acme LLC");
        operator.contact = Some(Contact {
            name: "Jane Founder".to_string(),
            phone: None,
            email: None,
            address: None,
            birth_date: None,
            government_id: None,
            responsibilities: None,
        });

        let normalized = NormalizedOperator::from_operator(operator);
        let rep = normalized.representative.expect("representative");

        assert!(rep.birth_date_provided);
        assert!(rep.government_id_provided);
        assert!(rep.responsibilities.is_controller);
        assert!(rep.responsibilities.is_owner);
        assert_eq!(rep.responsibilities.ownership_percentage, 100);
        assert_eq!(rep.responsibilities.job_title, "Owner");
    }

    #[test]
    fn test_representative_keeps_caller_responsibilities() {
        let mut operator = minimal_operator("Acme LLC");
        operator.contact = Some(Contact {
            name: "Sam CFO".to_string(),
            phone: None,
            email: None,
            address: None,
            birth_date: None,
            government_id: None,
            responsibilities: Some(Responsibilities {
                is_controller: Some(true),
                is_owner: Some(false),
                ownership_percentage: Some(0),
                job_title: Some("CFO".to_string()),
            }),
        });

        let rep = NormalizedOperator::from_operator(operator)
            .representative
            .unwrap();

        assert!(!rep.responsibilities.is_owner);
        assert_eq!(rep.responsibilities.ownership_percentage, 0);
        assert_eq!(rep.responsibilities.job_title, "CFO");
    }

    #[test]
    fn test_bank_account_holder_defaults() {
        let mut operator = minimal_operator("Acme LLC");
        operator.bank_account = Some(BankAccountInput {
            account_number: "0004321567000".to_string(),
            routing_number: "273976369".to_string(),
            bank_account_type: None,
            holder_name: None,
            holder_type: None,
        });

        let bank = NormalizedOperator::from_operator(operator)
            .bank_account
            .unwrap()
            .account;

        assert_eq!(bank.holder_name, "Acme LLC");
        assert_eq!(bank.holder_type, "business");
        assert_eq!(bank.bank_account_type, "checking");
    }

    #[test]
    fn test_account_payload_wire_shape() {
        let mut operator = minimal_operator("Acme LLC");
        operator.business_info.business_type = Some("Corp".to_string());
        operator.business_info.tax_id = Some("12-3456789".to_string());

        let normalized = NormalizedOperator::from_operator(operator);
        let payload = serde_json::to_value(&normalized.account).unwrap();

        assert_eq!(payload["accountType"], "business");
        assert_eq!(
            payload["profile"]["business"]["businessType"],
            "privateCorporation"
        );
        assert_eq!(
            payload["profile"]["business"]["taxID"]["ein"]["number"],
            "12-3456789"
        );
        // Unset optionals must not appear on the wire.
        assert!(payload["profile"]["business"].get("website").is_none());
        assert_eq!(
            payload["capabilities"],
            json!(["transfers", "send-funds", "collect-funds", "wallet"])
        );
    }

    #[test]
    fn test_step_failure_serialization() {
        let failure = StepFailure {
            operator: "Acme LLC".to_string(),
            account_id: Some("acct-1".to_string()),
            step: Step::AcceptTermsOfService,
            error: json!({"error": "bad token"}),
        };

        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["step"], "accept_terms_of_service");
        assert_eq!(value["accountID"], "acct-1");

        let without_account = StepFailure {
            account_id: None,
            ..failure
        };
        let value = serde_json::to_value(&without_account).unwrap();
        assert!(value.get("accountID").is_none());
    }

    #[test]
    fn test_operator_deserializes_camel_case() {
        let operator: Operator = serde_json::from_value(json!({
            "businessInfo": {
                "legalBusinessName": "Acme LLC",
                "businessType": "llc",
                "taxID": "12-3456789"
            },
            "contact": {"name": "Jane Founder", "governmentID": {"ssn": {"full": "000000000"}}}
        }))
        .unwrap();

        assert_eq!(operator.business_info.legal_business_name, "Acme LLC");
        assert_eq!(operator.business_info.tax_id.as_deref(), Some("12-3456789"));
        assert!(operator.contact.unwrap().government_id.is_some());
        assert!(operator.bank_account.is_none());
    }
}
