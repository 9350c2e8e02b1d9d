//! Database seeder for Faktura development and testing.
//!
//! Seeds a demo user, organization, clients, invoices with attachments, a
//! payment, and expenses for local development.
//!
//! Usage: cargo run --bin seeder
//!
//! Login afterwards with demo@faktura.dev / password123.

use chrono::{Days, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use faktura_db::entities::{
    clients, expenses, invoice_attachments, invoice_line_items, invoices, memberships,
    organizations, payments,
    sea_orm_active_enums::{AttachmentVisibility, InvoiceStatus, OrganizationRole},
    users,
};

/// Demo organization ID (consistent for all seeds)
const DEMO_ORG_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = faktura_db::connect(&database_url, 5, 1)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo user and organization...");
    seed_account(&db).await;

    println!("Seeding clients and invoices...");
    let client_ids = seed_clients(&db).await;
    seed_invoices(&db, &client_ids).await;

    println!("Seeding expenses...");
    seed_expenses(&db).await;

    println!("Seeding complete!");
    println!("Login with demo@faktura.dev / password123");
}

fn demo_org_id() -> Uuid {
    Uuid::parse_str(DEMO_ORG_ID).unwrap()
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

/// Seeds the demo user, organization, and OWNER membership.
async fn seed_account(db: &DatabaseConnection) {
    if users::Entity::find_by_id(demo_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo account already exists, skipping...");
        return;
    }

    let now = Utc::now().into();
    let password_hash =
        faktura_core::auth::hash_password("password123").expect("Failed to hash demo password");

    let org = organizations::ActiveModel {
        id: Set(demo_org_id()),
        name: Set("Demo Studio".to_string()),
        slug: Set("demo-studio".to_string()),
        base_currency: Set("USD".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    if let Err(e) = org.insert(db).await {
        eprintln!("Failed to insert demo organization: {e}");
        return;
    }

    let user = users::ActiveModel {
        id: Set(demo_user_id()),
        email: Set("demo@faktura.dev".to_string()),
        password_hash: Set(password_hash),
        name: Set("Demo User".to_string()),
        organization_id: Set(Some(demo_org_id())),
        created_at: Set(now),
        updated_at: Set(now),
    };
    if let Err(e) = user.insert(db).await {
        eprintln!("Failed to insert demo user: {e}");
        return;
    }

    let membership = memberships::ActiveModel {
        user_id: Set(demo_user_id()),
        organization_id: Set(demo_org_id()),
        role: Set(OrganizationRole::Owner),
        created_at: Set(now),
    };
    if let Err(e) = membership.insert(db).await {
        eprintln!("Failed to insert demo membership: {e}");
    } else {
        println!("  Created demo account: demo@faktura.dev");
    }
}

/// Seeds two demo clients and returns their ids.
async fn seed_clients(db: &DatabaseConnection) -> Vec<Uuid> {
    let now = Utc::now().into();
    let specs = [
        ("Alice Johnson", Some("Acme Corp"), Some("alice@acme.test")),
        ("Bob Stone", None, Some("bob@stone.test")),
    ];

    let mut ids = Vec::new();
    for (display_name, company, email) in specs {
        let id = Uuid::new_v4();
        let client = clients::ActiveModel {
            id: Set(id),
            organization_id: Set(demo_org_id()),
            display_name: Set(display_name.to_string()),
            company: Set(company.map(String::from)),
            email: Set(email.map(String::from)),
            phone: Set(None),
            business_phone: Set(None),
            mobile_phone: Set(None),
            address_line1: Set(None),
            address_line2: Set(None),
            city: Set(None),
            state: Set(None),
            postal_code: Set(None),
            country: Set(None),
            notes: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        match client.insert(db).await {
            Ok(_) => {
                println!("  Created client: {display_name}");
                ids.push(id);
            }
            Err(e) => eprintln!("Failed to insert client {display_name}: {e}"),
        }
    }
    ids
}

/// Seeds one attachment metadata row.
async fn seed_attachment(
    db: &DatabaseConnection,
    invoice_id: Uuid,
    file_name: &str,
    visibility: AttachmentVisibility,
) {
    let attachment = invoice_attachments::ActiveModel {
        id: Set(Uuid::new_v4()),
        invoice_id: Set(invoice_id),
        file_name: Set(file_name.to_string()),
        file_path: Set(format!("uploads/{invoice_id}/{file_name}")),
        file_size: Set(2048),
        file_type: Set("application/pdf".to_string()),
        visibility: Set(visibility),
        created_at: Set(Utc::now().into()),
    };
    if let Err(e) = attachment.insert(db).await {
        eprintln!("Failed to insert attachment {file_name}: {e}");
    } else {
        println!("  Created attachment: {file_name}");
    }
}

/// Seeds one invoice per status worth showing on the dashboard: a draft,
/// an open one, an overdue one, and a paid one with its payment.
async fn seed_invoices(db: &DatabaseConnection, client_ids: &[Uuid]) {
    let Some(&first) = client_ids.first() else {
        return;
    };
    let second = client_ids.get(1).copied().unwrap_or(first);

    let now = Utc::now();
    let today = now.date_naive();
    let overdue_due = today.checked_sub_days(Days::new(14)).unwrap_or(today);
    let open_due = today.checked_add_days(Days::new(21)).unwrap_or(today);

    let specs = [
        (first, "INV-0001", InvoiceStatus::Draft, None, "100", "0"),
        (
            first,
            "INV-0002",
            InvoiceStatus::Sent,
            Some(overdue_due),
            "200",
            "0",
        ),
        (
            second,
            "INV-0003",
            InvoiceStatus::Sent,
            Some(open_due),
            "50",
            "0",
        ),
        (
            second,
            "INV-0004",
            InvoiceStatus::Paid,
            Some(overdue_due),
            "300",
            "300",
        ),
    ];

    for (client_id, number, status, due_date, total, paid) in specs {
        let total: Decimal = total.parse().unwrap();
        let paid: Decimal = paid.parse().unwrap();
        let invoice_id = Uuid::new_v4();
        let is_paid = status == InvoiceStatus::Paid;

        let invoice = invoices::ActiveModel {
            id: Set(invoice_id),
            organization_id: Set(demo_org_id()),
            client_id: Set(client_id),
            number: Set(number.to_string()),
            status: Set(status),
            issue_date: Set(Some(today)),
            due_date: Set(due_date),
            currency: Set("USD".to_string()),
            subtotal: Set(total),
            tax: Set(Decimal::ZERO),
            discount: Set(Decimal::ZERO),
            total: Set(total),
            amount_paid: Set(paid),
            paid_at: Set(is_paid.then_some(today)),
            reference: Set(None),
            notes: Set(None),
            terms: Set(None),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = invoice.insert(db).await {
            eprintln!("Failed to insert invoice {number}: {e}");
            continue;
        }

        let item = invoice_line_items::ActiveModel {
            id: Set(Uuid::new_v4()),
            invoice_id: Set(invoice_id),
            description: Set("Consulting services".to_string()),
            quantity: Set(Decimal::ONE),
            unit_price: Set(total),
            line_total: Set(total),
            sort_order: Set(0),
            created_at: Set(now.into()),
        };
        if let Err(e) = item.insert(db).await {
            eprintln!("Failed to insert line item for {number}: {e}");
        }

        // One open invoice carries both visibility policies (the locked
        // file stays hidden until it is paid); the paid one shows that a
        // locked file unlocks.
        if number == "INV-0002" {
            seed_attachment(db, invoice_id, "contract.pdf", AttachmentVisibility::AlwaysViewable)
                .await;
            seed_attachment(
                db,
                invoice_id,
                "deliverable.pdf",
                AttachmentVisibility::LockedUntilPaid,
            )
            .await;
        }
        if number == "INV-0004" {
            seed_attachment(
                db,
                invoice_id,
                "final-report.pdf",
                AttachmentVisibility::LockedUntilPaid,
            )
            .await;
        }

        if is_paid {
            let payment = payments::ActiveModel {
                id: Set(Uuid::new_v4()),
                organization_id: Set(demo_org_id()),
                invoice_id: Set(invoice_id),
                amount: Set(paid),
                currency: Set("USD".to_string()),
                payment_date: Set(today),
                method: Set(Some("bank transfer".to_string())),
                notes: Set(None),
                created_at: Set(now.into()),
            };
            if let Err(e) = payment.insert(db).await {
                eprintln!("Failed to insert payment for {number}: {e}");
            }
        }

        println!("  Created invoice: {number}");
    }
}

/// Seeds a couple of expenses inside the last 30 days.
async fn seed_expenses(db: &DatabaseConnection) {
    let now = Utc::now();
    let today = now.date_naive();
    let specs = [
        ("Cloud Hosting Inc", Some("Software"), "45.00", today),
        (
            "Office Depot",
            Some("Supplies"),
            "120.50",
            today.checked_sub_days(Days::new(10)).unwrap_or(today),
        ),
    ];

    for (merchant, category, amount, expense_date) in specs {
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(demo_org_id()),
            client_id: Set(None),
            merchant: Set(merchant.to_string()),
            category: Set(category.map(String::from)),
            amount: Set(amount.parse().unwrap()),
            tax_amount: Set(Decimal::ZERO),
            currency: Set("USD".to_string()),
            expense_date: Set(expense_date),
            description: Set(None),
            is_recurring: Set(false),
            billable: Set(false),
            billed: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        if let Err(e) = expense.insert(db).await {
            eprintln!("Failed to insert expense {merchant}: {e}");
        } else {
            println!("  Created expense: {merchant}");
        }
    }
}
