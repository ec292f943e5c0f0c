use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_stock_days_table::Migration),
            Box::new(m20250101_000002_create_master_tables::Migration),
            Box::new(m20250101_000003_create_daily_stock_summary_table::Migration),
            Box::new(m20250101_000004_create_delivery_issues_table::Migration),
            Box::new(m20250101_000005_create_office_counter_sales_table::Migration),
            Box::new(m20250101_000006_create_cash_tables::Migration),
            Box::new(m20250101_000007_create_vehicle_empty_stock_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250101_000001_create_stock_days_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000001_create_stock_days_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StockDays::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockDays::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(StockDays::StockDate)
                                .date()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(StockDays::Status).string().not_null())
                        .col(
                            ColumnDef::new(StockDays::DeliveryNoMovement)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(StockDays::OfficeFinalized)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_days_status")
                        .table(StockDays::Table)
                        .col(StockDays::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockDays::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum StockDays {
        Table,
        Id,
        StockDate,
        Status,
        DeliveryNoMovement,
        OfficeFinalized,
    }
}

mod m20250101_000002_create_master_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000002_create_master_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(CylinderTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(CylinderTypes::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(CylinderTypes::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(CylinderTypes::Category).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryStaff::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryStaff::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryStaff::Name)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryStaff::Mobile)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryStaff::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(DeliveryStaff::IsOffice)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PriceComponents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PriceComponents::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PriceComponents::CylinderTypeId)
                                .big_integer()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PriceComponents::RefillAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PriceComponents::DepositAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PriceComponents::DocumentCharge)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PriceComponents::InstallationCharge)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PriceComponents::RegulatorCharge)
                                .decimal_len(12, 2)
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Reserved office counter entity; settlement math keys off this row.
            let seed_office = Query::insert()
                .into_table(DeliveryStaff::Table)
                .columns([
                    DeliveryStaff::Name,
                    DeliveryStaff::Mobile,
                    DeliveryStaff::IsActive,
                    DeliveryStaff::IsOffice,
                ])
                .values_panic([
                    "OFFICE".into(),
                    "0000000000".into(),
                    true.into(),
                    true.into(),
                ])
                .to_owned();
            manager.exec_stmt(seed_office).await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PriceComponents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DeliveryStaff::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(CylinderTypes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum CylinderTypes {
        Table,
        Id,
        Code,
        Category,
    }

    #[derive(DeriveIden)]
    enum DeliveryStaff {
        Table,
        Id,
        Name,
        Mobile,
        IsActive,
        IsOffice,
    }

    #[derive(DeriveIden)]
    enum PriceComponents {
        Table,
        Id,
        CylinderTypeId,
        RefillAmount,
        DepositAmount,
        DocumentCharge,
        InstallationCharge,
        RegulatorCharge,
    }
}

mod m20250101_000003_create_daily_stock_summary_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000003_create_daily_stock_summary_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DailyStockSummary::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DailyStockSummary::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::StockDayId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::CylinderTypeId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DailyStockSummary::OpeningFilled).integer().null())
                        .col(ColumnDef::new(DailyStockSummary::OpeningEmpty).integer().null())
                        .col(
                            ColumnDef::new(DailyStockSummary::DefectiveEmptyVehicle)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::ItemReceipt)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::ItemReturn)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::SalesRegular)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::NcQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::DbcQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::TvOutQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(DailyStockSummary::ClosingFilled).integer().null())
                        .col(ColumnDef::new(DailyStockSummary::ClosingEmpty).integer().null())
                        .col(ColumnDef::new(DailyStockSummary::TotalStock).integer().null())
                        .col(
                            ColumnDef::new(DailyStockSummary::IsReconciled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(DailyStockSummary::IoclNoMovement)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_summary_stock_day")
                                .from(DailyStockSummary::Table, DailyStockSummary::StockDayId)
                                .to(StockDays::Table, StockDays::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_summary_day_type")
                        .table(DailyStockSummary::Table)
                        .col(DailyStockSummary::StockDayId)
                        .col(DailyStockSummary::CylinderTypeId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DailyStockSummary::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DailyStockSummary {
        Table,
        Id,
        StockDayId,
        CylinderTypeId,
        OpeningFilled,
        OpeningEmpty,
        DefectiveEmptyVehicle,
        ItemReceipt,
        ItemReturn,
        SalesRegular,
        NcQty,
        DbcQty,
        TvOutQty,
        ClosingFilled,
        ClosingEmpty,
        TotalStock,
        IsReconciled,
        IoclNoMovement,
    }

    #[derive(DeriveIden)]
    enum StockDays {
        Table,
        Id,
    }
}

mod m20250101_000004_create_delivery_issues_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000004_create_delivery_issues_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeliveryIssues::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryIssues::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryIssues::StockDayId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryIssues::StaffId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryIssues::CylinderTypeId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryIssues::RegularQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryIssues::NcQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryIssues::DbcQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryIssues::TvOutQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(DeliveryIssues::Source).string().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_issues_stock_day")
                                .from(DeliveryIssues::Table, DeliveryIssues::StockDayId)
                                .to(StockDays::Table, StockDays::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_issues_day_staff_type")
                        .table(DeliveryIssues::Table)
                        .col(DeliveryIssues::StockDayId)
                        .col(DeliveryIssues::StaffId)
                        .col(DeliveryIssues::CylinderTypeId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliveryIssues::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DeliveryIssues {
        Table,
        Id,
        StockDayId,
        StaffId,
        CylinderTypeId,
        RegularQty,
        NcQty,
        DbcQty,
        TvOutQty,
        Source,
    }

    #[derive(DeriveIden)]
    enum StockDays {
        Table,
        Id,
    }
}

mod m20250101_000005_create_office_counter_sales_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000005_create_office_counter_sales_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(OfficeCounterSales::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(OfficeCounterSales::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::StockDayId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::CylinderTypeId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::OpeningRefill)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::ReceivedRefill)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::SoldRefill)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::OpeningNc)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::ReceivedNc)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::SoldNc)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::OpeningDbc)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::ReceivedDbc)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::SoldDbc)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::CashCollected)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(OfficeCounterSales::UpiCollected)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_office_sales_stock_day")
                                .from(OfficeCounterSales::Table, OfficeCounterSales::StockDayId)
                                .to(StockDays::Table, StockDays::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_office_sales_day_type")
                        .table(OfficeCounterSales::Table)
                        .col(OfficeCounterSales::StockDayId)
                        .col(OfficeCounterSales::CylinderTypeId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(OfficeCounterSales::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum OfficeCounterSales {
        Table,
        Id,
        StockDayId,
        CylinderTypeId,
        OpeningRefill,
        ReceivedRefill,
        SoldRefill,
        OpeningNc,
        ReceivedNc,
        SoldNc,
        OpeningDbc,
        ReceivedDbc,
        SoldDbc,
        CashCollected,
        UpiCollected,
    }

    #[derive(DeriveIden)]
    enum StockDays {
        Table,
        Id,
    }
}

mod m20250101_000006_create_cash_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000006_create_cash_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeliveryExpectedAmount::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryExpectedAmount::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryExpectedAmount::StockDayId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryExpectedAmount::StaffId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryExpectedAmount::ExpectedAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_expected_stock_day")
                                .from(
                                    DeliveryExpectedAmount::Table,
                                    DeliveryExpectedAmount::StockDayId,
                                )
                                .to(StockDays::Table, StockDays::Id),
                        )
                        .to_owned(),
                )
                .await?;

            // Unique per (day, staff): a racing double-finalize hits this
            // constraint instead of writing duplicate expected amounts.
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_expected_day_staff")
                        .table(DeliveryExpectedAmount::Table)
                        .col(DeliveryExpectedAmount::StockDayId)
                        .col(DeliveryExpectedAmount::StaffId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryCashDeposit::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryCashDeposit::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashDeposit::StockDayId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashDeposit::StaffId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashDeposit::CashAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashDeposit::UpiAmount)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashDeposit::TotalDeposited)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_deposit_stock_day")
                                .from(DeliveryCashDeposit::Table, DeliveryCashDeposit::StockDayId)
                                .to(StockDays::Table, StockDays::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_deposit_day_staff")
                        .table(DeliveryCashDeposit::Table)
                        .col(DeliveryCashDeposit::StockDayId)
                        .col(DeliveryCashDeposit::StaffId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(DeliveryCashBalance::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryCashBalance::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashBalance::StockDayId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashBalance::StaffId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashBalance::OpeningBalance)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashBalance::TodayExpected)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashBalance::TodayDeposited)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashBalance::ClosingBalance)
                                .decimal_len(12, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(DeliveryCashBalance::BalanceStatus)
                                .string()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_balance_stock_day")
                                .from(DeliveryCashBalance::Table, DeliveryCashBalance::StockDayId)
                                .to(StockDays::Table, StockDays::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_balance_day_staff")
                        .table(DeliveryCashBalance::Table)
                        .col(DeliveryCashBalance::StockDayId)
                        .col(DeliveryCashBalance::StaffId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DeliveryCashBalance::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(DeliveryCashDeposit::Table).to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(DeliveryExpectedAmount::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DeliveryExpectedAmount {
        Table,
        Id,
        StockDayId,
        StaffId,
        ExpectedAmount,
    }

    #[derive(DeriveIden)]
    enum DeliveryCashDeposit {
        Table,
        Id,
        StockDayId,
        StaffId,
        CashAmount,
        UpiAmount,
        TotalDeposited,
    }

    #[derive(DeriveIden)]
    enum DeliveryCashBalance {
        Table,
        Id,
        StockDayId,
        StaffId,
        OpeningBalance,
        TodayExpected,
        TodayDeposited,
        ClosingBalance,
        BalanceStatus,
    }

    #[derive(DeriveIden)]
    enum StockDays {
        Table,
        Id,
    }
}

mod m20250101_000007_create_vehicle_empty_stock_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250101_000007_create_vehicle_empty_stock_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DeliveryVehicleEmptyStock::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DeliveryVehicleEmptyStock::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(DeliveryVehicleEmptyStock::StockDayId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryVehicleEmptyStock::StaffId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryVehicleEmptyStock::CylinderTypeId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DeliveryVehicleEmptyStock::EmptyQty)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_vehicle_empty_stock_day")
                                .from(
                                    DeliveryVehicleEmptyStock::Table,
                                    DeliveryVehicleEmptyStock::StockDayId,
                                )
                                .to(StockDays::Table, StockDays::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("uq_vehicle_empty_day_staff_type")
                        .table(DeliveryVehicleEmptyStock::Table)
                        .col(DeliveryVehicleEmptyStock::StockDayId)
                        .col(DeliveryVehicleEmptyStock::StaffId)
                        .col(DeliveryVehicleEmptyStock::CylinderTypeId)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(DeliveryVehicleEmptyStock::Table)
                        .to_owned(),
                )
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DeliveryVehicleEmptyStock {
        Table,
        Id,
        StockDayId,
        StaffId,
        CylinderTypeId,
        EmptyQty,
    }

    #[derive(DeriveIden)]
    enum StockDays {
        Table,
        Id,
    }
}
