//! Security-group rollup per VPC.

use crate::model::{SecurityGroupSummary, Vpc};
use indexmap::IndexMap;

/// Collect the distinct security groups referenced anywhere inside a VPC.
///
/// Walks subnets in order, each subnet's instances in order, and each
/// instance's rules in order. The first rule that mentions a group id wins:
/// it fixes both the group's position in the output and the name recorded
/// for it. Later rules carrying the same id are ignored even if their
/// `sg_name` differs. Rules with an empty `sg_id` contribute nothing.
#[must_use]
pub fn aggregate_security_groups(vpc: &Vpc) -> Vec<SecurityGroupSummary> {
    let mut seen: IndexMap<&str, &str> = IndexMap::new();
    for subnet in &vpc.subnets {
        for instance in &subnet.instances {
            for rule in &instance.security_rules {
                if rule.sg_id.is_empty() {
                    continue;
                }
                seen.entry(rule.sg_id.as_str()).or_insert(rule.sg_name.as_str());
            }
        }
    }
    seen.into_iter()
        .map(|(id, name)| SecurityGroupSummary {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}
