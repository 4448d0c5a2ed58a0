//! Projection construction for each filter.

use super::{
    aggregate_security_groups, FlatRow, InstanceRow, Projection, ResourceFilter, SubnetRow,
    ViewNode,
};
use crate::model::Region;

/// Build the projection of one inventory snapshot under one filter.
///
/// Input order is preserved everywhere: regions, VPCs, subnets, and instances
/// appear exactly as ordered in the snapshot, with no sorting or reordering.
/// Only the security-group filter prunes; every other tree filter keeps
/// empty containers visible.
#[must_use]
pub fn project(inventory: &[Region], filter: ResourceFilter) -> Projection {
    match filter {
        ResourceFilter::All => Projection::Tree(project_all(inventory)),
        ResourceFilter::Vpc => Projection::Tree(project_vpcs(inventory)),
        ResourceFilter::Subnet => Projection::Flat(project_subnet_rows(inventory)),
        ResourceFilter::Instance => Projection::Flat(project_instance_rows(inventory)),
        ResourceFilter::SecurityGroup => Projection::Tree(project_security_groups(inventory)),
    }
}

fn project_all(inventory: &[Region]) -> Vec<ViewNode> {
    inventory
        .iter()
        .map(|region| ViewNode::Region {
            name: region.region.clone(),
            error: region.error.clone(),
            children: region
                .vpcs
                .iter()
                .map(|vpc| ViewNode::Vpc {
                    id: vpc.id.clone(),
                    name: vpc.name.clone(),
                    cidr: vpc.cidr.clone(),
                    region: region.region.clone(),
                    children: vpc
                        .subnets
                        .iter()
                        .map(|subnet| ViewNode::Subnet {
                            id: subnet.id.clone(),
                            name: subnet.name.clone(),
                            cidr: subnet.cidr.clone(),
                            az: subnet.az.clone(),
                            region: region.region.clone(),
                            children: subnet
                                .instances
                                .iter()
                                .map(|instance| ViewNode::Instance {
                                    instance: instance.clone(),
                                    region: region.region.clone(),
                                })
                                .collect(),
                        })
                        .collect(),
                })
                .collect(),
        })
        .collect()
}

fn project_vpcs(inventory: &[Region]) -> Vec<ViewNode> {
    inventory
        .iter()
        .map(|region| ViewNode::Region {
            name: region.region.clone(),
            error: region.error.clone(),
            children: region
                .vpcs
                .iter()
                .map(|vpc| ViewNode::Vpc {
                    id: vpc.id.clone(),
                    name: vpc.name.clone(),
                    cidr: vpc.cidr.clone(),
                    region: region.region.clone(),
                    children: Vec::new(),
                })
                .collect(),
        })
        .collect()
}

fn project_subnet_rows(inventory: &[Region]) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    for region in inventory {
        for vpc in &region.vpcs {
            for subnet in &vpc.subnets {
                rows.push(FlatRow::Subnet(SubnetRow {
                    instance_count: subnet.instances.len(),
                    subnet: subnet.clone(),
                    vpc_id: vpc.id.clone(),
                    vpc_name: vpc.name.clone(),
                    region: region.region.clone(),
                }));
            }
        }
    }
    rows
}

fn project_instance_rows(inventory: &[Region]) -> Vec<FlatRow> {
    let mut rows = Vec::new();
    for region in inventory {
        for vpc in &region.vpcs {
            for subnet in &vpc.subnets {
                for instance in &subnet.instances {
                    rows.push(FlatRow::Instance(InstanceRow {
                        instance: instance.clone(),
                        az: subnet.az.clone(),
                        vpc_id: vpc.id.clone(),
                        vpc_name: vpc.name.clone(),
                        subnet_name: subnet.name.clone(),
                        region: region.region.clone(),
                    }));
                }
            }
        }
    }
    rows
}

fn project_security_groups(inventory: &[Region]) -> Vec<ViewNode> {
    inventory
        .iter()
        .filter_map(|region| {
            let vpcs: Vec<ViewNode> = region
                .vpcs
                .iter()
                .filter_map(|vpc| {
                    let groups = aggregate_security_groups(vpc);
                    if groups.is_empty() {
                        // VPCs with no referenced groups are pruned.
                        return None;
                    }
                    Some(ViewNode::Vpc {
                        id: vpc.id.clone(),
                        name: vpc.name.clone(),
                        cidr: vpc.cidr.clone(),
                        region: region.region.clone(),
                        children: groups
                            .into_iter()
                            .map(|group| ViewNode::SecurityGroup {
                                group,
                                region: region.region.clone(),
                            })
                            .collect(),
                    })
                })
                .collect();
            if vpcs.is_empty() {
                // Regions left without VPCs after pruning disappear too.
                return None;
            }
            Some(ViewNode::Region {
                name: region.region.clone(),
                error: region.error.clone(),
                children: vpcs,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Instance, SecurityRule, Subnet, Vpc};

    fn sample_inventory() -> Vec<Region> {
        vec![
            Region {
                region: "us-east-1".to_string(),
                vpcs: vec![Vpc {
                    id: "vpc-1".to_string(),
                    name: "prod".to_string(),
                    cidr: "10.0.0.0/16".to_string(),
                    subnets: vec![
                        Subnet {
                            id: "subnet-a".to_string(),
                            name: "prod-a".to_string(),
                            cidr: "10.0.1.0/24".to_string(),
                            az: "us-east-1a".to_string(),
                            instances: vec![Instance {
                                id: "i-1".to_string(),
                                name: "web".to_string(),
                                state: "running".to_string(),
                                security_rules: vec![SecurityRule {
                                    sg_id: "sg-1".to_string(),
                                    sg_name: "web-sg".to_string(),
                                    ..SecurityRule::default()
                                }],
                                ..Instance::default()
                            }],
                        },
                        Subnet {
                            id: "subnet-b".to_string(),
                            name: "prod-b".to_string(),
                            az: "us-east-1b".to_string(),
                            ..Subnet::default()
                        },
                    ],
                }],
                error: None,
            },
            Region {
                region: "eu-west-1".to_string(),
                vpcs: Vec::new(),
                error: Some("AccessDenied".to_string()),
            },
        ]
    }

    #[test]
    fn all_projects_full_tree_without_pruning() {
        let projection = project(&sample_inventory(), ResourceFilter::All);
        let roots = projection.roots();
        assert_eq!(roots.len(), 2);

        // The empty, errored region survives.
        let ViewNode::Region { name, error, children } = &roots[1] else {
            panic!("expected region node");
        };
        assert_eq!(name, "eu-west-1");
        assert_eq!(error.as_deref(), Some("AccessDenied"));
        assert!(children.is_empty());

        // Depth: region -> vpc -> subnet -> instance.
        let vpc = &roots[0].children()[0];
        let subnet = &vpc.children()[0];
        assert_eq!(subnet.node_id(), "subnet:subnet-a");
        assert_eq!(subnet.children()[0].node_id(), "instance:i-1");

        // The instance-less subnet is kept.
        assert_eq!(vpc.children()[1].node_id(), "subnet:subnet-b");
        assert!(vpc.children()[1].children().is_empty());
    }

    #[test]
    fn vpc_filter_hides_everything_below_vpcs() {
        let projection = project(&sample_inventory(), ResourceFilter::Vpc);
        let roots = projection.roots();
        assert_eq!(roots.len(), 2);
        let vpc = &roots[0].children()[0];
        assert_eq!(vpc.node_id(), "vpc:vpc-1");
        assert!(vpc.children().is_empty());
    }

    #[test]
    fn subnet_filter_flattens_with_context() {
        let projection = project(&sample_inventory(), ResourceFilter::Subnet);
        let rows = projection.rows();
        assert_eq!(rows.len(), 2);
        let FlatRow::Subnet(row) = &rows[0] else {
            panic!("expected subnet row");
        };
        assert_eq!(row.subnet.id, "subnet-a");
        assert_eq!(row.vpc_name, "prod");
        assert_eq!(row.region, "us-east-1");
        assert_eq!(row.instance_count, 1);

        let FlatRow::Subnet(empty) = &rows[1] else {
            panic!("expected subnet row");
        };
        assert_eq!(empty.instance_count, 0);
    }

    #[test]
    fn instance_filter_flattens_with_context() {
        let projection = project(&sample_inventory(), ResourceFilter::Instance);
        let rows = projection.rows();
        assert_eq!(rows.len(), 1);
        let FlatRow::Instance(row) = &rows[0] else {
            panic!("expected instance row");
        };
        assert_eq!(row.instance.id, "i-1");
        assert_eq!(row.az, "us-east-1a");
        assert_eq!(row.subnet_name, "prod-a");
        assert_eq!(row.vpc_id, "vpc-1");
        assert_eq!(row.region, "us-east-1");
    }

    #[test]
    fn security_group_filter_prunes_empty_branches() {
        let projection = project(&sample_inventory(), ResourceFilter::SecurityGroup);
        let roots = projection.roots();
        // eu-west-1 has no VPCs and is pruned entirely.
        assert_eq!(roots.len(), 1);
        let vpc = &roots[0].children()[0];
        assert_eq!(vpc.children().len(), 1);
        assert_eq!(vpc.children()[0].node_id(), "sg:sg-1");
    }

    #[test]
    fn empty_inventory_projects_empty_under_every_filter() {
        for filter in [
            ResourceFilter::All,
            ResourceFilter::Vpc,
            ResourceFilter::Subnet,
            ResourceFilter::Instance,
            ResourceFilter::SecurityGroup,
        ] {
            let projection = project(&[], filter);
            assert!(projection.is_empty(), "{filter:?}");
            assert_eq!(
                projection.mode() == crate::projection::ProjectionMode::Tree,
                filter.is_tree()
            );
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let inventory = sample_inventory();
        assert_eq!(
            project(&inventory, ResourceFilter::All),
            project(&inventory, ResourceFilter::All)
        );
    }
}
