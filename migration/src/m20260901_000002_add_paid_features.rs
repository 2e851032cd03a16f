use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum PaidFeatures {
    Table,
    Id,
    Code,
    Name,
    Description,
    PriceCents,
    DurationDays,
    AppliesTo,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PurchasedFeatures {
    Table,
    Id,
    OwnerType,
    OwnerId,
    FeatureId,
    Status,
    StartsAt,
    EndsAt,
    PricePaid,
    Metadata,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("feature_owner_type"))
                    .values(vec![
                        Alias::new("artist"),
                        Alias::new("venue"),
                        Alias::new("event"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("purchased_feature_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("active"),
                        Alias::new("canceled"),
                        Alias::new("expired"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaidFeatures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaidFeatures::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PaidFeatures::Code)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PaidFeatures::Name).string_len(255).not_null())
                    .col(ColumnDef::new(PaidFeatures::Description).text().null())
                    .col(
                        ColumnDef::new(PaidFeatures::PriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaidFeatures::DurationDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PaidFeatures::AppliesTo)
                            .custom(Alias::new("feature_owner_type"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PaidFeatures::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PaidFeatures::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PurchasedFeatures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PurchasedFeatures::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::OwnerType)
                            .custom(Alias::new("feature_owner_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::OwnerId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::FeatureId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::Status)
                            .custom(Alias::new("purchased_feature_status"))
                            .not_null()
                            .default(Expr::cust("'pending'::purchased_feature_status")),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::StartsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::EndsAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::PricePaid)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::Metadata)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'{}'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PurchasedFeatures::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_purchased_features_feature")
                            .from(PurchasedFeatures::Table, PurchasedFeatures::FeatureId)
                            .to(PaidFeatures::Table, PaidFeatures::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_purchased_features_owner")
                    .table(PurchasedFeatures::Table)
                    .col(PurchasedFeatures::OwnerType)
                    .col(PurchasedFeatures::OwnerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_purchased_features_status_ends")
                    .table(PurchasedFeatures::Table)
                    .col(PurchasedFeatures::Status)
                    .col(PurchasedFeatures::EndsAt)
                    .to_owned(),
            )
            .await?;

        // default catalog
        let seed = Query::insert()
            .into_table(PaidFeatures::Table)
            .columns([
                PaidFeatures::Code,
                PaidFeatures::Name,
                PaidFeatures::Description,
                PaidFeatures::PriceCents,
                PaidFeatures::DurationDays,
            ])
            .values_panic([
                "featured_listing".into(),
                "Featured listing".into(),
                "Pinned to the top of directory listings".into(),
                1500.into(),
                30.into(),
            ])
            .values_panic([
                "homepage_spotlight".into(),
                "Homepage spotlight".into(),
                "Shown in the homepage carousel".into(),
                4900.into(),
                7.into(),
            ])
            .values_panic([
                "extended_gallery".into(),
                "Extended gallery".into(),
                "Raises the gallery limit".into(),
                900.into(),
                365.into(),
            ])
            .to_owned();
        manager.exec_stmt(seed).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PurchasedFeatures::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(PaidFeatures::Table)
                    .to_owned(),
            )
            .await?;
        for name in ["purchased_feature_status", "feature_owner_type"] {
            manager
                .drop_type(Type::drop().if_exists().name(Alias::new(name)).to_owned())
                .await?;
        }
        Ok(())
    }
}
