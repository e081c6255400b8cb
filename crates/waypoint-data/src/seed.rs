//! Seed datasets for the mock directory.

use chrono::{DateTime, Utc};
use waypoint_core::models::*;

fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap_or_else(|_| Utc::now())
}

pub fn users() -> Vec<User> {
    let raw: &[(&str, &str, &str, &str, UserRole, UserStatus, &str, bool)] = &[
        ("1", "Jason Chapel", "jasonchapel97@gmail.com", "+234 812 345 2661", UserRole::TourGuide, UserStatus::Active, "2025-10-14T12:24:00Z", true),
        ("2", "Sarah Johnson", "sarahj@gmail.com", "+234 812 345 2661", UserRole::Traveler, UserStatus::Active, "2025-10-14T12:24:00Z", true),
        ("3", "Angela Abdul", "angieabdul@rocketmail.com", "+234 812 345 2661", UserRole::TourGuide, UserStatus::Active, "2025-10-14T12:24:00Z", true),
        ("4", "Shalli Oniel", "shalli.oniel@gmail.com", "+234 812 345 2661", UserRole::Traveler, UserStatus::Pending, "2025-10-14T12:24:00Z", false),
        ("5", "Michael Chen", "michael.chen@gmail.com", "+234 812 345 2662", UserRole::TourGuide, UserStatus::Active, "2025-10-13T10:15:00Z", true),
        ("6", "Emma Wilson", "emma.wilson@gmail.com", "+234 812 345 2663", UserRole::Traveler, UserStatus::Active, "2025-10-12T14:30:00Z", false),
        ("7", "David Brown", "david.brown@gmail.com", "+234 812 345 2664", UserRole::TourGuide, UserStatus::Inactive, "2025-10-11T09:45:00Z", true),
        ("8", "Lisa Garcia", "lisa.garcia@gmail.com", "+234 812 345 2665", UserRole::Traveler, UserStatus::Active, "2025-10-10T16:20:00Z", true),
        ("9", "Robert Taylor", "robert.taylor@gmail.com", "+234 812 345 2666", UserRole::TourGuide, UserStatus::Pending, "2025-10-09T11:10:00Z", false),
        ("10", "Jennifer Lee", "jennifer.lee@gmail.com", "+234 812 345 2667", UserRole::Traveler, UserStatus::Active, "2025-10-08T13:25:00Z", true),
        ("11", "James Anderson", "james.anderson@gmail.com", "+234 812 345 2668", UserRole::TourGuide, UserStatus::Active, "2025-10-07T15:40:00Z", true),
        ("12", "Maria Rodriguez", "maria.rodriguez@gmail.com", "+234 812 345 2669", UserRole::Traveler, UserStatus::Inactive, "2025-10-06T12:55:00Z", false),
    ];

    raw.iter()
        .map(|(id, name, email, phone, role, status, joined, verified)| User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            role: *role,
            status: *status,
            date_joined: ts(joined),
            avatar: Some("/placeholder.svg?height=40&width=40".to_string()),
            is_verified: *verified,
        })
        .collect()
}

pub fn bookings() -> Vec<Booking> {
    let raw: &[(&str, &str, &str, &str, &str, f64, BookingStatus)] = &[
        ("BK-1001", "Yankari Wildlife Safari", "Sarah Johnson", "Amina Yusuf", "2025-11-14T09:00:00Z", 520_000.0, BookingStatus::Upcoming),
        ("BK-1002", "2 days relaxation at Ziba Beach Resort", "Emma Wilson", "Asake Bello", "2025-12-05T10:00:00Z", 450_000.0, BookingStatus::Upcoming),
        ("BK-1003", "3 day Abeokuta Adventure", "Lisa Garcia", "Tunde Bakare", "2025-10-10T08:00:00Z", 120_000.0, BookingStatus::Completed),
        ("BK-1004", "4-day Tarkwa Bay Beach Retreat", "Jennifer Lee", "Jason Chapel", "2025-09-21T08:30:00Z", 300_000.0, BookingStatus::Completed),
        ("BK-1005", "Obudu Mountain Resort Hike", "Maria Rodriguez", "Angela Abdul", "2025-12-18T07:00:00Z", 610_000.0, BookingStatus::Upcoming),
        ("BK-1006", "Lekki Conservation Canopy Walk", "Shalli Oniel", "Jason Chapel", "2025-08-30T11:00:00Z", 85_000.0, BookingStatus::Completed),
        ("BK-1007", "Olumo Rock Day Trip", "Sarah Johnson", "Tunde Bakare", "2025-10-02T09:00:00Z", 95_000.0, BookingStatus::Cancelled),
        ("BK-1008", "Idanre Hills Expedition", "Emma Wilson", "Amina Yusuf", "2026-01-09T06:30:00Z", 210_000.0, BookingStatus::Upcoming),
        ("BK-1009", "Calabar Carnival Weekend", "Jennifer Lee", "Angela Abdul", "2025-12-27T12:00:00Z", 480_000.0, BookingStatus::Upcoming),
        ("BK-1010", "Erin Ijesha Waterfall Tour", "Lisa Garcia", "Jason Chapel", "2025-07-15T10:00:00Z", 75_000.0, BookingStatus::Completed),
        ("BK-1011", "Zuma Rock Sunrise Trek", "Maria Rodriguez", "Amina Yusuf", "2025-11-22T05:30:00Z", 130_000.0, BookingStatus::Upcoming),
        ("BK-1012", "Badagry Heritage Walk", "Shalli Oniel", "Tunde Bakare", "2025-06-08T09:30:00Z", 110_000.0, BookingStatus::Completed),
    ];

    raw.iter()
        .map(|(id, tour, user, guide, date, amount, status)| Booking {
            id: id.to_string(),
            tour_name: tour.to_string(),
            user_name: user.to_string(),
            guide_name: guide.to_string(),
            date: ts(date),
            amount: *amount,
            status: *status,
        })
        .collect()
}

pub fn transactions() -> Vec<Transaction> {
    let raw: &[(&str, TransactionKind, &str, &str, f64, TransactionStatus, Option<&str>, Option<&str>, Option<&str>)] = &[
        ("TX-2001", TransactionKind::TourEarnings, "2025-10-12T14:00:00Z", "Earnings from Yankari Wildlife Safari", 494_000.0, TransactionStatus::Completed, Some("Yankari Wildlife Safari"), None, Some("1")),
        ("TX-2002", TransactionKind::Withdrawal, "2025-10-11T09:30:00Z", "Withdrawal to bank account", 250_000.0, TransactionStatus::Completed, None, Some("GTBank account 4727286789"), Some("1")),
        ("TX-2003", TransactionKind::TourEarnings, "2025-10-09T16:45:00Z", "Earnings from 3 day Abeokuta Adventure", 114_000.0, TransactionStatus::Completed, Some("3 day Abeokuta Adventure"), None, Some("3")),
        ("TX-2004", TransactionKind::Withdrawal, "2025-10-08T12:10:00Z", "Withdrawal to bank account", 90_000.0, TransactionStatus::Pending, None, Some("Zenith account 5512093321"), Some("3")),
        ("TX-2005", TransactionKind::TourEarnings, "2025-10-05T10:20:00Z", "Earnings from Lekki Conservation Canopy Walk", 80_750.0, TransactionStatus::Completed, Some("Lekki Conservation Canopy Walk"), None, Some("1")),
        ("TX-2006", TransactionKind::TourEarnings, "2025-10-01T18:05:00Z", "Earnings from Olumo Rock Day Trip", 90_250.0, TransactionStatus::Failed, Some("Olumo Rock Day Trip"), None, Some("3")),
        ("TX-2007", TransactionKind::Withdrawal, "2025-09-28T08:55:00Z", "Withdrawal to bank account", 150_000.0, TransactionStatus::Completed, None, Some("Access account 0098123471"), Some("5")),
        ("TX-2008", TransactionKind::TourEarnings, "2025-09-22T13:35:00Z", "Earnings from 4-day Tarkwa Bay Beach Retreat", 285_000.0, TransactionStatus::Completed, Some("4-day Tarkwa Bay Beach Retreat"), None, Some("1")),
        ("TX-2009", TransactionKind::Withdrawal, "2025-09-18T15:15:00Z", "Withdrawal to bank account", 60_000.0, TransactionStatus::Failed, None, Some("UBA account 2209871265"), Some("11")),
        ("TX-2010", TransactionKind::TourEarnings, "2025-09-10T11:40:00Z", "Earnings from Erin Ijesha Waterfall Tour", 71_250.0, TransactionStatus::Completed, Some("Erin Ijesha Waterfall Tour"), None, Some("1")),
        ("TX-2011", TransactionKind::TourEarnings, "2025-09-02T09:25:00Z", "Earnings from Badagry Heritage Walk", 104_500.0, TransactionStatus::Completed, Some("Badagry Heritage Walk"), None, Some("3")),
        ("TX-2012", TransactionKind::Withdrawal, "2025-08-29T17:50:00Z", "Withdrawal to bank account", 200_000.0, TransactionStatus::Pending, None, Some("GTBank account 4727286789"), Some("5")),
    ];

    raw.iter()
        .map(
            |(id, kind, date, description, amount, status, tour, bank, user)| Transaction {
                id: id.to_string(),
                kind: *kind,
                date: ts(date),
                description: description.to_string(),
                amount: *amount,
                status: *status,
                tour_name: tour.map(str::to_string),
                bank_account: bank.map(str::to_string),
                user_id: user.map(str::to_string),
            },
        )
        .collect()
}

pub fn tours() -> Vec<Tour> {
    let raw: &[(&str, &str, TourStatus, f64, &str, &str, &str, u32)] = &[
        ("1", "Yankari Wildlife Safari", TourStatus::Active, 520_000.0, "Bauchi State, Nigeria", "Amina Yusuf", "Nov 14th - Nov 17th 2025", 1),
        ("2", "2 days relaxation at Ziba Beach Resort", TourStatus::PendingReview, 450_000.0, "Lagos State, Nigeria", "Asake Bello", "Dec 5th - Dec 7th 2025", 0),
        ("3", "3 day Abeokuta Adventure", TourStatus::PendingReview, 120_000.0, "Ogun State, Nigeria", "Tunde Bakare", "Oct 10th - Oct 12th 2025", 0),
        ("4", "4-day Tarkwa Bay Beach Retreat", TourStatus::PendingReview, 300_000.0, "Lagos State, Nigeria", "Jason Chapel", "Sep 21st - Sep 24th 2025", 2),
        ("5", "Obudu Mountain Resort Hike", TourStatus::Active, 610_000.0, "Cross River State, Nigeria", "Angela Abdul", "Dec 18th - Dec 21st 2025", 3),
        ("6", "Lekki Conservation Canopy Walk", TourStatus::Completed, 85_000.0, "Lagos State, Nigeria", "Jason Chapel", "Aug 30th 2025", 14),
        ("7", "Olumo Rock Day Trip", TourStatus::Paused, 95_000.0, "Ogun State, Nigeria", "Tunde Bakare", "Oct 2nd 2025", 5),
        ("8", "Idanre Hills Expedition", TourStatus::Active, 210_000.0, "Ondo State, Nigeria", "Amina Yusuf", "Jan 9th - Jan 11th 2026", 2),
    ];

    raw.iter()
        .map(|(id, title, status, price, location, guide, dates, bookings)| Tour {
            id: id.to_string(),
            title: title.to_string(),
            status: *status,
            price: *price,
            location: location.to_string(),
            guide: guide.to_string(),
            dates: dates.to_string(),
            bookings: *bookings,
            image: Some(format!(
                "/placeholder.svg?height=200&width=300&text={}",
                title.split_whitespace().next().unwrap_or("Tour")
            )),
        })
        .collect()
}

pub fn verifications() -> Vec<VerificationRequest> {
    let raw: &[(&str, &str, &str, &str)] = &[
        ("1", "Tunde Bakare", "tunde.b@gmail.com", "12345678902"),
        ("2", "Greg Adeshola", "gregade77@gmail.com", "12345678902"),
        ("3", "Sheila April", "sheilacutie335@yahoo.com", "12345678902"),
        ("4", "Amina Yusuf", "amina.yusuf@gmail.com", "99812034571"),
        ("5", "Asake Bello", "asake.bello@gmail.com", "45098217763"),
        ("6", "Jason Chapel", "jasonchapel97@gmail.com", "77120945582"),
    ];

    raw.iter()
        .map(|(id, name, email, nin)| VerificationRequest {
            id: id.to_string(),
            user: VerificationUser {
                name: name.to_string(),
                email: email.to_string(),
                phone: Some("+234 812 345 2661".to_string()),
                avatar: Some("/placeholder.svg".to_string()),
            },
            nin: nin.to_string(),
            submitted_at: ts("2025-10-14T12:24:00Z"),
            status: VerificationStatus::Pending,
        })
        .collect()
}
