//! Create `carro` table.
//!
//! `modelo` carries the UNIQUE constraint the SQL store relies on for conflict detection.
//! On MySQL it uses a binary collation so lookups and uniqueness are case-sensitive,
//! as they are on the other backends.
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn create_carro(backend: DbBackend) -> TableCreateStatement {
    let mut modelo = ColumnDef::new(Carro::Modelo);
    modelo.string_len(255).not_null().unique_key();
    if backend == DbBackend::MySql {
        modelo.extra("COLLATE utf8mb4_bin");
    }

    Table::create()
        .table(Carro::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Carro::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(&mut modelo)
        .col(ColumnDef::new(Carro::Preco).decimal_len(12, 2).not_null())
        .col(ColumnDef::new(Carro::Image).string_len(500).null())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(create_carro(manager.get_database_backend())).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Carro::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Carro { Table, Id, Modelo, Preco, Image }
