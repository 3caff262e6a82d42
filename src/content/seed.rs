//! First-boot seeding with default site content

use serde_json::{json, Value};
use tracing::{error, info};

use crate::content::document::{self, Document};
use crate::content::repository::ContentRepository;
use crate::core::{Error, Result};

/// Insert `defaults` into `collection` if and only if it currently holds no
/// documents. Returns whether anything was inserted.
///
/// Every default document must already carry an `id`.
pub async fn ensure_seeded(
    repository: &ContentRepository,
    collection: &str,
    defaults: Vec<Document>,
) -> Result<bool> {
    document::validate_collection_name(collection)?;
    if let Some(missing) = defaults.iter().position(|doc| document::document_id(doc).is_none()) {
        return Err(Error::invalid_input(format!(
            "Seed document {} for {} has no id",
            missing, collection
        )));
    }

    let inserted = repository.store().seed_if_empty(collection, defaults).await?;
    if inserted {
        info!(collection, "seeded default content");
    }
    Ok(inserted)
}

/// Seed a single collection with its defaults, logging rather than failing.
///
/// Used on read paths that should still render when seeding cannot run.
pub async fn ensure_collection_seeded(repository: &ContentRepository, collection: &str) {
    let Some(defaults) = default_documents(collection) else {
        return;
    };
    if let Err(err) = ensure_seeded(repository, collection, defaults).await {
        error!(collection, "seeding failed: {}", err);
    }
}

/// Seed every public collection. Returns the names that were populated.
pub async fn seed_defaults(repository: &ContentRepository) -> Result<Vec<String>> {
    let mut seeded = Vec::new();
    for collection in SEEDED_COLLECTIONS {
        let defaults = default_documents(collection).unwrap_or_default();
        if ensure_seeded(repository, collection, defaults).await? {
            seeded.push(collection.to_string());
        }
    }
    Ok(seeded)
}

/// Collections with default content, in seeding order
pub const SEEDED_COLLECTIONS: &[&str] = &[
    document::NAVIGATION,
    document::HERO,
    document::SERVICES,
    document::ABOUT,
    document::PROJECTS,
    document::CONTACT,
    document::FOOTER,
    document::SITE_CONFIG,
];

/// Fresh default documents for a collection; every document and nested
/// sub-item gets a new id
pub fn default_documents(collection: &str) -> Option<Vec<Document>> {
    let values = match collection {
        document::NAVIGATION => vec![
            json!({"title": "Home", "href": "#home"}),
            json!({"title": "Services", "href": "#services"}),
            json!({"title": "About", "href": "#about"}),
            json!({"title": "Projects", "href": "#projects"}),
            json!({"title": "Contact", "href": "#contact"}),
        ],
        document::HERO => vec![json!({
            "title": "Innovative Software Solutions",
            "subtitle": "Building the future with code and creativity",
            "buttonText": "Get Started",
            "buttonLink": "#services",
        })],
        document::SERVICES => vec![
            json!({
                "icon": "Brain",
                "title": "AI/ML Solutions",
                "description": "Advanced machine learning models and AI systems that deliver intelligent insights for your business.",
                "gradient": "from-blue-600 to-purple-600",
                "hoverGradient": "from-blue-700 to-purple-700",
            }),
            json!({
                "icon": "Code",
                "title": "Software Development",
                "description": "Custom software solutions built with modern technologies and scalable architecture for optimal performance.",
                "gradient": "from-purple-600 to-pink-600",
                "hoverGradient": "from-purple-700 to-pink-700",
            }),
            json!({
                "icon": "Cog",
                "title": "Smart Systems & Automation",
                "description": "Intelligent automation systems that streamline processes and increase operational efficiency.",
                "gradient": "from-pink-600 to-red-600",
                "hoverGradient": "from-pink-700 to-red-700",
            }),
            json!({
                "icon": "Database",
                "title": "Data-Driven Applications",
                "description": "Powerful applications that leverage data analytics to drive informed decision-making.",
                "gradient": "from-red-600 to-orange-600",
                "hoverGradient": "from-red-700 to-orange-700",
            }),
        ],
        document::ABOUT => vec![json!({
            "title": "About Us",
            "subtitle": "Driving innovation through technology",
            "description": "We are a team of passionate developers, designers, and technologists dedicated to creating exceptional digital experiences. With expertise across various domains, we tackle complex challenges and deliver solutions that exceed expectations.",
            "stats": [
                {"value": "50+", "label": "Projects Completed"},
                {"value": "10+", "label": "Years Experience"},
                {"value": "30+", "label": "Happy Clients"},
                {"value": "99%", "label": "Client Satisfaction"},
            ],
            "features": [
                {
                    "title": "Modern Tech Stack",
                    "description": "We use the latest technologies and frameworks to build robust and scalable applications.",
                },
                {
                    "title": "User-Centric Design",
                    "description": "Our solutions are designed with the end-user in mind, ensuring intuitive and engaging experiences.",
                },
                {
                    "title": "Agile Methodology",
                    "description": "We follow agile practices to deliver value quickly and adapt to changing requirements.",
                },
                {
                    "title": "Continuous Support",
                    "description": "Our commitment doesn't end at deployment; we provide ongoing support and maintenance.",
                },
            ],
        })],
        document::PROJECTS => vec![
            json!({
                "title": "AI-Powered Analytics Platform",
                "description": "A comprehensive analytics platform leveraging machine learning to provide actionable insights from complex data sets.",
                "iconName": "Heart",
                "imageUrl": "/images/project1.jpg",
                "tags": ["AI", "Machine Learning", "Data Analytics"],
                "link": "https://example.com",
                "githubLink": "https://github.com/example",
            }),
            json!({
                "title": "E-Commerce Mobile App",
                "description": "A feature-rich mobile application for a leading e-commerce brand, enhancing user experience and driving sales.",
                "iconName": "Users",
                "imageUrl": "/images/project2.jpg",
                "tags": ["React Native", "Redux", "Node.js"],
                "link": "https://example.com",
                "githubLink": "https://github.com/example",
            }),
            json!({
                "title": "Smart Home Automation System",
                "description": "An IoT-based system for comprehensive home automation, offering seamless control over various smart devices.",
                "iconName": "Home",
                "imageUrl": "/images/project3.jpg",
                "tags": ["IoT", "Embedded Systems", "Cloud"],
                "link": "https://example.com",
                "githubLink": "https://github.com/example",
            }),
            json!({
                "title": "Enterprise Resource Planning Solution",
                "description": "A scalable ERP solution tailored for medium to large businesses, streamlining operations and improving efficiency.",
                "iconName": "CreditCard",
                "imageUrl": "/images/project4.jpg",
                "tags": ["SaaS", "Cloud Architecture", "Enterprise"],
                "link": "https://example.com",
                "githubLink": "https://github.com/example",
            }),
        ],
        document::CONTACT => vec![json!({
            "title": "Get in Touch",
            "subtitle": "We'd love to hear from you",
            "email": "hello@devnex.com",
            "phone": "+1 (555) 123-4567",
            "address": "123 Tech Park, Silicon Valley, CA 94025",
        })],
        document::FOOTER => vec![json!({
            "companyName": "Devnex",
            "description": "Building innovative software solutions for the modern world.",
            "socialLinks": [
                {"platform": "Twitter", "url": "https://twitter.com", "icon": "Twitter"},
                {"platform": "GitHub", "url": "https://github.com", "icon": "Github"},
                {"platform": "LinkedIn", "url": "https://linkedin.com", "icon": "Linkedin"},
            ],
            "copyright": "© 2023 Devnex. All rights reserved.",
        })],
        document::SITE_CONFIG => vec![json!({
            "siteName": "Devnex",
            "siteDescription": "Professional software development services",
            "siteUrl": "https://devnex.com",
            "favicon": "/favicon.ico",
            "logo": "/logo.svg",
        })],
        _ => return None,
    };

    Some(values.into_iter().filter_map(with_ids).collect())
}

/// Give a document and every object inside its array fields a fresh id
fn with_ids(value: Value) -> Option<Document> {
    let Value::Object(mut doc) = value else {
        return None;
    };
    for field in doc.values_mut() {
        if let Value::Array(items) = field {
            for item in items.iter_mut() {
                if let Value::Object(sub_item) = item {
                    document::ensure_id(sub_item);
                }
            }
        }
    }
    document::ensure_id(&mut doc);
    Some(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn repository() -> ContentRepository {
        ContentRepository::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_every_default_carries_ids() {
        for collection in SEEDED_COLLECTIONS {
            let docs = default_documents(collection).unwrap();
            assert!(!docs.is_empty(), "{}", collection);
            for doc in &docs {
                assert!(document::document_id(doc).is_some(), "{}", collection);
            }
        }

        let about = default_documents(document::ABOUT).unwrap().remove(0);
        let stat_ids: HashSet<_> = about["stats"]
            .as_array()
            .unwrap()
            .iter()
            .map(|stat| stat["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(stat_ids.len(), 4);
    }

    #[test]
    fn test_unknown_collection_has_no_defaults() {
        assert!(default_documents("contacts").is_none());
        assert!(default_documents("anything").is_none());
    }

    #[tokio::test]
    async fn test_seeding_twice_does_not_duplicate() {
        let repo = repository();
        let defaults = default_documents(document::SERVICES).unwrap();

        assert!(ensure_seeded(&repo, "services", defaults.clone()).await.unwrap());
        assert!(!ensure_seeded(&repo, "services", defaults.clone()).await.unwrap());

        let stored = repo.list("services").await;
        assert_eq!(stored, defaults);
    }

    #[tokio::test]
    async fn test_seed_rejects_documents_without_id() {
        let repo = repository();
        let bad = vec![Document::new()];
        assert!(ensure_seeded(&repo, "hero", bad).await.is_err());
        assert_eq!(repo.count("hero").await, 0);
    }

    #[tokio::test]
    async fn test_seed_defaults_fills_every_public_collection() {
        let repo = repository();
        let seeded = seed_defaults(&repo).await.unwrap();
        assert_eq!(seeded.len(), SEEDED_COLLECTIONS.len());
        assert_eq!(repo.count(document::HERO).await, 1);
        assert_eq!(repo.count(document::NAVIGATION).await, 5);

        // Second boot is a no-op
        assert!(seed_defaults(&repo).await.unwrap().is_empty());
        assert_eq!(repo.count(document::PROJECTS).await, 4);
    }
}
