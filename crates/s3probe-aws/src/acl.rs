//! Conversion between SDK ACL shapes and [`BucketAcl`].
//!
//! PUT-ACL writes back exactly what GET returned, so both directions must
//! preserve every field the service reports.

use aws_sdk_s3::operation::get_bucket_acl::GetBucketAclOutput;
use aws_sdk_s3::types::{AccessControlPolicy, Grant, Grantee, Owner, Permission, Type};
use s3probe_core::{AclGrant, AclGrantee, AclOwner, ApiError, BucketAcl};

/// Build a [`BucketAcl`] from a `GetBucketAcl` response.
#[must_use]
pub fn acl_from_output(output: &GetBucketAclOutput) -> BucketAcl {
    BucketAcl {
        owner: output.owner().map(owner_from_sdk),
        grants: output.grants().iter().map(grant_from_sdk).collect(),
    }
}

/// Build the `AccessControlPolicy` body for `PutBucketAcl`.
pub fn policy_from_acl(acl: &BucketAcl) -> Result<AccessControlPolicy, ApiError> {
    let grants = acl
        .grants
        .iter()
        .map(grant_to_sdk)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AccessControlPolicy::builder()
        .set_owner(acl.owner.as_ref().map(owner_to_sdk))
        .set_grants(Some(grants))
        .build())
}

fn owner_from_sdk(owner: &Owner) -> AclOwner {
    AclOwner {
        id: owner.id().map(ToOwned::to_owned),
        display_name: owner.display_name().map(ToOwned::to_owned),
    }
}

fn owner_to_sdk(owner: &AclOwner) -> Owner {
    Owner::builder()
        .set_id(owner.id.clone())
        .set_display_name(owner.display_name.clone())
        .build()
}

fn grant_from_sdk(grant: &Grant) -> AclGrant {
    AclGrant {
        grantee: grant.grantee().map(|g| AclGrantee {
            kind: g.r#type().as_str().to_owned(),
            id: g.id().map(ToOwned::to_owned),
            display_name: g.display_name().map(ToOwned::to_owned),
            email_address: g.email_address().map(ToOwned::to_owned),
            uri: g.uri().map(ToOwned::to_owned),
        }),
        permission: grant.permission().map(|p| p.as_str().to_owned()),
    }
}

fn grant_to_sdk(grant: &AclGrant) -> Result<Grant, ApiError> {
    let grantee = grant
        .grantee
        .as_ref()
        .map(|g| {
            Grantee::builder()
                .r#type(Type::from(g.kind.as_str()))
                .set_id(g.id.clone())
                .set_display_name(g.display_name.clone())
                .set_email_address(g.email_address.clone())
                .set_uri(g.uri.clone())
                .build()
                .map_err(|e| ApiError::Other(format!("invalid grantee: {e}")))
        })
        .transpose()?;

    Ok(Grant::builder()
        .set_grantee(grantee)
        .set_permission(grant.permission.as_deref().map(Permission::from))
        .build())
}
