use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    Username,
    PasswordHash,
    Role,
    ArtistId,
    OrganiserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Artists {
    Table,
    Id,
    Name,
    Genre,
    Bio,
    Hometown,
    Image,
    Gallery,
    OwnerType,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Organisers {
    Table,
    Id,
    Name,
    ContactEmail,
    Website,
    Bio,
    Image,
    Gallery,
    OwnerType,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Venues {
    Table,
    Id,
    Name,
    Address,
    City,
    Capacity,
    Description,
    Image,
    Gallery,
    OwnerType,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Title,
    Description,
    StartsAt,
    EndsAt,
    VenueId,
    Poster,
    Gallery,
    TicketUrl,
    PriceCents,
    Status,
    OwnerType,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum EventArtists {
    Table,
    EventId,
    ArtistId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Favorites {
    Table,
    Id,
    UserId,
    ItemType,
    ItemId,
    CreatedAt,
}

fn timestamps<T: IntoIden>(created_at: T, updated_at: T) -> [ColumnDef; 2] {
    [
        ColumnDef::new(created_at)
            .timestamp_with_time_zone()
            .default(Expr::cust("NOW()"))
            .null()
            .to_owned(),
        ColumnDef::new(updated_at)
            .timestamp_with_time_zone()
            .default(Expr::cust("NOW()"))
            .null()
            .to_owned(),
    ]
}

fn empty_gallery<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .json_binary()
        .not_null()
        .default(Expr::cust("'[]'::jsonb"))
        .to_owned()
}

fn owner_columns<T: IntoIden>(owner_type: T, owner_id: T) -> [ColumnDef; 2] {
    [
        ColumnDef::new(owner_type)
            .custom(Alias::new("account_owner_type"))
            .not_null()
            .to_owned(),
        ColumnDef::new(owner_id).big_integer().not_null().to_owned(),
    ]
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // enums
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("user_role"))
                    .values(vec![
                        Alias::new("user"),
                        Alias::new("artist"),
                        Alias::new("organiser"),
                        Alias::new("admin"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("account_owner_type"))
                    .values(vec![
                        Alias::new("artist"),
                        Alias::new("organiser"),
                        Alias::new("user"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("event_status"))
                    .values(vec![Alias::new("scheduled"), Alias::new("canceled")])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("favorite_type"))
                    .values(vec![
                        Alias::new("artist"),
                        Alias::new("event"),
                        Alias::new("venue"),
                        Alias::new("organiser"),
                    ])
                    .to_owned(),
            )
            .await?;

        // users
        let [mut created_at, mut updated_at] = timestamps(Users::CreatedAt, Users::UpdatedAt);
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Username).string_len(64).not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .custom(Alias::new("user_role"))
                            .not_null()
                            .default(Expr::cust("'user'::user_role")),
                    )
                    .col(ColumnDef::new(Users::ArtistId).big_integer().null())
                    .col(ColumnDef::new(Users::OrganiserId).big_integer().null())
                    .col(&mut created_at)
                    .col(&mut updated_at)
                    .to_owned(),
            )
            .await?;

        // artists
        let [mut owner_type, mut owner_id] = owner_columns(Artists::OwnerType, Artists::OwnerId);
        let [mut created_at, mut updated_at] = timestamps(Artists::CreatedAt, Artists::UpdatedAt);
        manager
            .create_table(
                Table::create()
                    .table(Artists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Artists::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Artists::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Artists::Genre).string_len(128).null())
                    .col(ColumnDef::new(Artists::Bio).text().null())
                    .col(ColumnDef::new(Artists::Hometown).string_len(255).null())
                    .col(ColumnDef::new(Artists::Image).string_len(1024).null())
                    .col(&mut empty_gallery(Artists::Gallery))
                    .col(&mut owner_type)
                    .col(&mut owner_id)
                    .col(&mut created_at)
                    .col(&mut updated_at)
                    .to_owned(),
            )
            .await?;

        // organisers
        let [mut owner_type, mut owner_id] = owner_columns(Organisers::OwnerType, Organisers::OwnerId);
        let [mut created_at, mut updated_at] = timestamps(Organisers::CreatedAt, Organisers::UpdatedAt);
        manager
            .create_table(
                Table::create()
                    .table(Organisers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Organisers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Organisers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Organisers::ContactEmail).string_len(255).null())
                    .col(ColumnDef::new(Organisers::Website).string_len(1024).null())
                    .col(ColumnDef::new(Organisers::Bio).text().null())
                    .col(ColumnDef::new(Organisers::Image).string_len(1024).null())
                    .col(&mut empty_gallery(Organisers::Gallery))
                    .col(&mut owner_type)
                    .col(&mut owner_id)
                    .col(&mut created_at)
                    .col(&mut updated_at)
                    .to_owned(),
            )
            .await?;

        // venues
        let [mut owner_type, mut owner_id] = owner_columns(Venues::OwnerType, Venues::OwnerId);
        let [mut created_at, mut updated_at] = timestamps(Venues::CreatedAt, Venues::UpdatedAt);
        manager
            .create_table(
                Table::create()
                    .table(Venues::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Venues::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Venues::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Venues::Address).string_len(512).null())
                    .col(ColumnDef::new(Venues::City).string_len(128).null())
                    .col(ColumnDef::new(Venues::Capacity).integer().null())
                    .col(ColumnDef::new(Venues::Description).text().null())
                    .col(ColumnDef::new(Venues::Image).string_len(1024).null())
                    .col(&mut empty_gallery(Venues::Gallery))
                    .col(&mut owner_type)
                    .col(&mut owner_id)
                    .col(&mut created_at)
                    .col(&mut updated_at)
                    .to_owned(),
            )
            .await?;

        // events
        let [mut owner_type, mut owner_id] = owner_columns(Events::OwnerType, Events::OwnerId);
        let [mut created_at, mut updated_at] = timestamps(Events::CreatedAt, Events::UpdatedAt);
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(
                        ColumnDef::new(Events::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Events::EndsAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Events::VenueId).big_integer().null())
                    .col(ColumnDef::new(Events::Poster).string_len(1024).null())
                    .col(&mut empty_gallery(Events::Gallery))
                    .col(ColumnDef::new(Events::TicketUrl).string_len(1024).null())
                    .col(ColumnDef::new(Events::PriceCents).big_integer().null())
                    .col(
                        ColumnDef::new(Events::Status)
                            .custom(Alias::new("event_status"))
                            .not_null()
                            .default(Expr::cust("'scheduled'::event_status")),
                    )
                    .col(&mut owner_type)
                    .col(&mut owner_id)
                    .col(&mut created_at)
                    .col(&mut updated_at)
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_venue")
                            .from(Events::Table, Events::VenueId)
                            .to(Venues::Table, Venues::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // lineup
        manager
            .create_table(
                Table::create()
                    .table(EventArtists::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventArtists::EventId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventArtists::ArtistId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EventArtists::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(EventArtists::EventId)
                            .col(EventArtists::ArtistId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_artists_event")
                            .from(EventArtists::Table, EventArtists::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_artists_artist")
                            .from(EventArtists::Table, EventArtists::ArtistId)
                            .to(Artists::Table, Artists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // favorites
        manager
            .create_table(
                Table::create()
                    .table(Favorites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Favorites::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Favorites::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Favorites::ItemType)
                            .custom(Alias::new("favorite_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Favorites::ItemId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Favorites::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_favorites_user")
                            .from(Favorites::Table, Favorites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // indexes
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uniq_favorites_user_item")
                    .table(Favorites::Table)
                    .col(Favorites::UserId)
                    .col(Favorites::ItemType)
                    .col(Favorites::ItemId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_starts_at")
                    .table(Events::Table)
                    .col(Events::StartsAt)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_venue")
                    .table(Events::Table)
                    .col(Events::VenueId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_venues_owner")
                    .table(Venues::Table)
                    .col(Venues::OwnerType)
                    .col(Venues::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Favorites::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(EventArtists::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Venues::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Organisers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Artists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;
        for name in ["favorite_type", "event_status", "account_owner_type", "user_role"] {
            manager
                .drop_type(Type::drop().if_exists().name(Alias::new(name)).to_owned())
                .await?;
        }
        Ok(())
    }
}
