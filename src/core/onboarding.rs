use crate::adapters::moov::MoovClient;
use crate::core::scopes::resolve_scopes;
use crate::domain::model::{
    CreatedAccount, NormalizedOperator, OnboardingOutcome, Operator, Step, StepFailure,
};
use crate::utils::error::{ProxyError, Result};
use serde_json::{json, Value};

/// Sequential business-account onboarding over a batch of operators.
///
/// The bootstrap token is a shared precondition: if it cannot be obtained the
/// whole batch fails. After that, one operator's failure never aborts its
/// siblings; provider rejections are collected into the outcome's error list.
pub struct OnboardingPipeline {
    moov: MoovClient,
}

/// A transport-level fault that aborts the remaining steps of one operator.
struct StepAbort {
    step: Step,
    account_id: Option<String>,
    error: ProxyError,
}

impl StepAbort {
    fn at(step: Step, account_id: Option<&str>) -> impl FnOnce(ProxyError) -> StepAbort + '_ {
        move |error| StepAbort {
            step,
            account_id: account_id.map(str::to_string),
            error,
        }
    }
}

impl OnboardingPipeline {
    pub fn new(moov: MoovClient) -> Self {
        Self { moov }
    }

    pub async fn run(&self, operators: Vec<Operator>) -> Result<OnboardingOutcome> {
        let bootstrap = self
            .moov
            .request_token(&resolve_scopes(None, false))
            .await?;

        if !bootstrap.is_success() {
            return Err(ProxyError::upstream(
                "Failed to get access token",
                bootstrap.status.as_u16(),
                bootstrap.body,
            ));
        }

        let bootstrap_token = bootstrap.access_token().unwrap_or_default().to_string();
        let total = operators.len();
        let mut outcome = OnboardingOutcome::default();

        for operator in operators {
            let normalized = NormalizedOperator::from_operator(operator);

            if let Err(abort) = self
                .onboard_operator(&normalized, &bootstrap_token, &mut outcome)
                .await
            {
                let step = if abort.error.is_timeout() {
                    Step::Timeout
                } else {
                    abort.step
                };
                tracing::error!(
                    "Pipeline aborted for {} at {}: {}",
                    normalized.legal_name,
                    abort.step,
                    abort.error
                );
                outcome.errors.push(StepFailure {
                    operator: normalized.legal_name.clone(),
                    account_id: abort.account_id,
                    step,
                    error: json!({ "message": abort.error.to_string() }),
                });
            }
        }

        tracing::info!(
            "Processed {} operators: {} accounts created, {} step failures",
            total,
            outcome.accounts.len(),
            outcome.errors.len()
        );

        Ok(outcome)
    }

    async fn onboard_operator(
        &self,
        operator: &NormalizedOperator,
        bootstrap_token: &str,
        outcome: &mut OnboardingOutcome,
    ) -> std::result::Result<(), StepAbort> {
        let name = &operator.legal_name;

        // Create the business entity. Failure here skips every remaining
        // step for this operator.
        let created = self
            .moov
            .create_account(bootstrap_token, &operator.account)
            .await
            .map_err(StepAbort::at(Step::CreateAccount, None))?;

        if !created.is_success() {
            tracing::error!("Error creating account for {}", name);
            outcome.errors.push(StepFailure {
                operator: name.clone(),
                account_id: None,
                step: Step::CreateAccount,
                error: created.body,
            });
            return Ok(());
        }

        let Some(account_id) = created
            .body
            .get("accountID")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            outcome.errors.push(StepFailure {
                operator: name.clone(),
                account_id: None,
                step: Step::CreateAccount,
                error: created.body,
            });
            return Ok(());
        };

        tracing::info!("Account created: {} for {}", account_id, name);

        // Entity-scoped re-auth. On any failure we keep going with the
        // bootstrap token; downstream steps surface the scope gap themselves.
        let scoped_token = match self
            .moov
            .request_token(&resolve_scopes(Some(&account_id), true))
            .await
        {
            Ok(exchange) if exchange.is_success() => match exchange.access_token() {
                Some(token) => token.to_string(),
                None => {
                    tracing::warn!(
                        "Scoped token reply for account {} had no access_token, \
                         falling back to bootstrap token",
                        account_id
                    );
                    bootstrap_token.to_string()
                }
            },
            Ok(exchange) => {
                tracing::warn!(
                    "Scoped token rejected for account {} ({}), falling back to bootstrap token",
                    account_id,
                    exchange.status
                );
                bootstrap_token.to_string()
            }
            Err(error) => {
                tracing::warn!(
                    "Scoped token request failed for account {} ({}), \
                     falling back to bootstrap token",
                    account_id,
                    error
                );
                bootstrap_token.to_string()
            }
        };

        let record_failure =
            |outcome: &mut OnboardingOutcome, step: Step, error: Value| {
                tracing::error!("Step {} failed for {} ({})", step, name, account_id);
                outcome.errors.push(StepFailure {
                    operator: name.clone(),
                    account_id: Some(account_id.clone()),
                    step,
                    error,
                });
            };

        // Terms of service: fetch the one-time disclosure token, then accept.
        let tos = self
            .moov
            .tos_token(&scoped_token)
            .await
            .map_err(StepAbort::at(Step::GetTosToken, Some(&account_id)))?;

        if tos.is_success() {
            let token = tos
                .body
                .get("token")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let accepted = self
                .moov
                .patch_account(
                    &scoped_token,
                    &account_id,
                    &json!({ "termsOfService": { "token": token } }),
                )
                .await
                .map_err(StepAbort::at(Step::AcceptTermsOfService, Some(&account_id)))?;

            if accepted.is_success() {
                tracing::info!("Terms of service accepted for account {}", account_id);
            } else {
                record_failure(outcome, Step::AcceptTermsOfService, accepted.body);
            }
        } else {
            record_failure(outcome, Step::GetTosToken, tos.body);
        }

        // Controlling representative, then the ownership-disclosure-complete
        // update. The follow-up only runs when registration succeeded.
        if let Some(representative) = &operator.representative {
            let added = self
                .moov
                .add_representative(&scoped_token, &account_id, representative)
                .await
                .map_err(StepAbort::at(Step::AddRepresentative, Some(&account_id)))?;

            if added.is_success() {
                tracing::info!("Representative added for account {}", account_id);

                let owners = self
                    .moov
                    .patch_account(
                        &scoped_token,
                        &account_id,
                        &json!({ "profile": { "business": { "ownersProvided": true } } }),
                    )
                    .await
                    .map_err(StepAbort::at(Step::MarkOwnersProvided, Some(&account_id)))?;

                if owners.is_success() {
                    tracing::info!("Owners marked as provided for account {}", account_id);
                } else {
                    record_failure(outcome, Step::MarkOwnersProvided, owners.body);
                }
            } else {
                record_failure(outcome, Step::AddRepresentative, added.body);
            }
        }

        // Underwriting thresholds, always submitted (defaults applied during
        // normalization).
        let underwriting = self
            .moov
            .update_underwriting(&scoped_token, &account_id, &operator.underwriting)
            .await
            .map_err(StepAbort::at(Step::UpdateUnderwriting, Some(&account_id)))?;

        if underwriting.is_success() {
            tracing::info!("Underwriting updated for account {}", account_id);
        } else {
            record_failure(outcome, Step::UpdateUnderwriting, underwriting.body);
        }

        if let Some(bank_account) = &operator.bank_account {
            let attached = self
                .moov
                .add_bank_account(&scoped_token, &account_id, bank_account)
                .await
                .map_err(StepAbort::at(Step::AddBankAccount, Some(&account_id)))?;

            if attached.is_success() {
                tracing::info!("Bank account added for account {}", account_id);
            } else {
                record_failure(outcome, Step::AddBankAccount, attached.body);
            }
        }

        outcome.accounts.push(CreatedAccount {
            operator_name: name.clone(),
            account_id,
            moov_account: created.body,
            access_token: scoped_token,
        });

        Ok(())
    }
}
