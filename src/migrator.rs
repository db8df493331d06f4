use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_dishes_table::Migration),
            Box::new(m20240101_000002_create_sales_tables::Migration),
            Box::new(m20240101_000003_create_investors_table::Migration),
            Box::new(m20240101_000004_create_expenses_table::Migration),
            Box::new(m20240101_000005_create_users_table::Migration),
            Box::new(m20240101_000006_create_order_counters_table::Migration),
        ]
    }
}

mod m20240101_000001_create_dishes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_dishes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Dishes::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Dishes::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Dishes::Name).string().not_null())
                        .col(
                            ColumnDef::new(Dishes::Price)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Dishes::Category).string().not_null())
                        .col(
                            ColumnDef::new(Dishes::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Dishes::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Dishes {
        Table,
        Id,
        Name,
        Price,
        Category,
        CreatedAt,
    }
}

mod m20240101_000002_create_sales_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_sales_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Sales::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sales::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Sales::OrderNo).string().not_null())
                        .col(ColumnDef::new(Sales::SaleDate).date().not_null())
                        .col(
                            ColumnDef::new(Sales::TotalAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Sales::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_created_at")
                        .table(Sales::Table)
                        .col(Sales::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_sale_date")
                        .table(Sales::Table)
                        .col(Sales::SaleDate)
                        .to_owned(),
                )
                .await?;

            // No foreign key to dishes: items are a historical snapshot.
            manager
                .create_table(
                    Table::create()
                        .table(SaleItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SaleItems::SaleId).uuid().not_null())
                        .col(ColumnDef::new(SaleItems::DishId).uuid().not_null())
                        .col(ColumnDef::new(SaleItems::DishName).string().not_null())
                        .col(
                            ColumnDef::new(SaleItems::Price)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(SaleItems::Quantity).integer().not_null())
                        .col(ColumnDef::new(SaleItems::Position).integer().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sale_items_sale_id")
                                .from(SaleItems::Table, SaleItems::SaleId)
                                .to(Sales::Table, Sales::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sale_items_sale_id")
                        .table(SaleItems::Table)
                        .col(SaleItems::SaleId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sale_items_dish_id")
                        .table(SaleItems::Table)
                        .col(SaleItems::DishId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SaleItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Sales::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Sales {
        Table,
        Id,
        OrderNo,
        SaleDate,
        TotalAmount,
        CreatedAt,
    }

    #[derive(Iden)]
    enum SaleItems {
        Table,
        Id,
        SaleId,
        DishId,
        DishName,
        Price,
        Quantity,
        Position,
    }
}

mod m20240101_000003_create_investors_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_investors_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Investors::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Investors::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Investors::Name).string().not_null())
                        .col(
                            ColumnDef::new(Investors::Amount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Investors::ContributedOn).date().not_null())
                        .col(
                            ColumnDef::new(Investors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Investors::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Investors {
        Table,
        Id,
        Name,
        Amount,
        ContributedOn,
        CreatedAt,
    }
}

mod m20240101_000004_create_expenses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_expenses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Expenses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Expenses::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Expenses::Description).string().not_null())
                        .col(
                            ColumnDef::new(Expenses::Amount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Expenses::Category).string().not_null())
                        .col(ColumnDef::new(Expenses::SpentOn).date().not_null())
                        .col(
                            ColumnDef::new(Expenses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_expenses_created_at")
                        .table(Expenses::Table)
                        .col(Expenses::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Expenses::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Expenses {
        Table,
        Id,
        Description,
        Amount,
        Category,
        SpentOn,
        CreatedAt,
    }
}

mod m20240101_000005_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Users::Username)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Users {
        Table,
        Id,
        Username,
        PasswordHash,
        CreatedAt,
    }
}

mod m20240101_000006_create_order_counters_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_order_counters_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OrderCounters::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OrderCounters::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OrderCounters::Value)
                                .big_integer()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            // Seed the sale counter so assignment can assume the row exists.
            let insert = Query::insert()
                .into_table(OrderCounters::Table)
                .columns([OrderCounters::Name, OrderCounters::Value])
                .values_panic(["sale_order_no".into(), 0.into()])
                .to_owned();
            manager.exec_stmt(insert).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OrderCounters::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum OrderCounters {
        Table,
        Name,
        Value,
    }
}
