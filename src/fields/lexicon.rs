//! Pattern tables and word lists shared by the field extractors.
//!
//! Kept as data so tuning accuracy means editing a table, not a loop.

/// Skills grouped by category. Matching is whole-word and
/// case-insensitive; display capitalization comes from
/// [`CANONICAL_CAPS`] or Title Case.
pub static SKILL_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "programming_languages",
        &[
            "python", "java", "javascript", "typescript", "c++", "c#", "ruby", "php", "go",
            "golang", "rust", "kotlin", "swift", "scala", "perl", "objective-c", "r", "matlab",
            "dart", "elixir", "erlang", "haskell", "clojure", "groovy", "lua", "julia", "fortran",
            "cobol", "vba", "bash", "powershell",
        ],
    ),
    (
        "web_frontend",
        &[
            "html", "css", "sass", "less", "react", "angular", "vue", "svelte", "next.js",
            "nuxt", "jquery", "bootstrap", "tailwind", "webpack", "vite", "redux", "ember",
            "backbone", "gatsby", "three.js", "d3.js",
        ],
    ),
    (
        "web_backend",
        &[
            "node.js", "express", "django", "flask", "fastapi", "spring", "spring boot", "rails",
            "laravel", "symfony", "asp.net", "graphql", "rest", "grpc", "websockets", "celery",
            "sidekiq", "nestjs", "gin", "fiber", "actix", "axum",
        ],
    ),
    (
        "databases",
        &[
            "sql", "mysql", "postgresql", "postgres", "sqlite", "mongodb", "redis", "cassandra",
            "dynamodb", "elasticsearch", "oracle", "sql server", "mariadb", "couchdb", "neo4j",
            "influxdb", "snowflake", "bigquery", "redshift", "clickhouse", "memcached",
        ],
    ),
    (
        "cloud_devops",
        &[
            "aws", "azure", "gcp", "google cloud", "docker", "kubernetes", "terraform", "ansible",
            "jenkins", "gitlab ci", "github actions", "circleci", "travis", "helm", "prometheus",
            "grafana", "datadog", "nginx", "apache", "linux", "unix", "vagrant", "puppet", "chef",
            "cloudformation", "serverless", "lambda", "ec2", "s3", "heroku", "vercel", "netlify",
        ],
    ),
    (
        "data_ml",
        &[
            "machine learning", "deep learning", "tensorflow", "pytorch", "keras", "scikit-learn",
            "pandas", "numpy", "scipy", "nlp", "computer vision", "opencv", "spark", "hadoop",
            "kafka", "airflow", "tableau", "power bi", "data analysis", "data science",
            "statistics", "jupyter", "xgboost", "hugging face", "llm", "ai", "ml", "etl",
            "data engineering", "data visualization", "matplotlib", "seaborn",
        ],
    ),
    (
        "mobile",
        &[
            "android", "ios", "react native", "flutter", "xamarin", "ionic", "swiftui",
            "jetpack compose", "cordova",
        ],
    ),
    (
        "tools_practices",
        &[
            "git", "svn", "jira", "confluence", "agile", "scrum", "kanban", "tdd", "bdd",
            "ci/cd", "microservices", "design patterns", "oop", "functional programming",
            "unit testing", "integration testing", "selenium", "cypress", "playwright",
            "postman", "swagger", "api", "oauth", "jwt", "soap", "mvc", "orm", "unreal",
            "unity", "figma", "sketch", "photoshop", "illustrator", "ui", "ux",
            "ui/ux", "wireframing", "prototyping", "accessibility", "seo",
        ],
    ),
    (
        "soft_skills",
        &[
            "leadership", "communication", "teamwork", "problem solving", "project management",
            "time management", "mentoring", "public speaking", "negotiation", "collaboration",
            "critical thinking", "stakeholder management",
        ],
    ),
];

/// Display capitalization that Title Case gets wrong.
pub static CANONICAL_CAPS: &[(&str, &str)] = &[
    ("html", "HTML"),
    ("css", "CSS"),
    ("sql", "SQL"),
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("mongodb", "MongoDB"),
    ("dynamodb", "DynamoDB"),
    ("couchdb", "CouchDB"),
    ("influxdb", "InfluxDB"),
    ("sqlite", "SQLite"),
    ("mariadb", "MariaDB"),
    ("bigquery", "BigQuery"),
    ("clickhouse", "ClickHouse"),
    ("aws", "AWS"),
    ("gcp", "GCP"),
    ("api", "API"),
    ("ui", "UI"),
    ("ux", "UX"),
    ("ui/ux", "UI/UX"),
    ("nlp", "NLP"),
    ("ai", "AI"),
    ("ml", "ML"),
    ("llm", "LLM"),
    ("etl", "ETL"),
    ("ci/cd", "CI/CD"),
    ("tdd", "TDD"),
    ("bdd", "BDD"),
    ("oop", "OOP"),
    ("mvc", "MVC"),
    ("orm", "ORM"),
    ("seo", "SEO"),
    ("jwt", "JWT"),
    ("oauth", "OAuth"),
    ("soap", "SOAP"),
    ("php", "PHP"),
    ("vba", "VBA"),
    ("ios", "iOS"),
    ("javascript", "JavaScript"),
    ("typescript", "TypeScript"),
    ("node.js", "Node.js"),
    ("next.js", "Next.js"),
    ("d3.js", "D3.js"),
    ("three.js", "Three.js"),
    ("nestjs", "NestJS"),
    ("jquery", "jQuery"),
    ("fastapi", "FastAPI"),
    ("graphql", "GraphQL"),
    ("grpc", "gRPC"),
    ("rest", "REST"),
    ("asp.net", "ASP.NET"),
    ("scikit-learn", "scikit-learn"),
    ("numpy", "NumPy"),
    ("scipy", "SciPy"),
    ("pytorch", "PyTorch"),
    ("tensorflow", "TensorFlow"),
    ("xgboost", "XGBoost"),
    ("opencv", "OpenCV"),
    ("matlab", "MATLAB"),
    ("circleci", "CircleCI"),
    ("gitlab ci", "GitLab CI"),
    ("github actions", "GitHub Actions"),
    ("cloudformation", "CloudFormation"),
    ("ec2", "EC2"),
    ("s3", "S3"),
    ("swiftui", "SwiftUI"),
    ("svn", "SVN"),
];

/// Lines matching one of these (case-insensitive, optional trailing
/// colon) are treated as section headers.
pub static SUMMARY_HEADERS: &[&str] = &[
    "summary",
    "professional summary",
    "executive summary",
    "profile",
    "professional profile",
    "objective",
    "career objective",
    "about",
    "about me",
    "overview",
];

pub static EXPERIENCE_HEADERS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "employment",
    "employment history",
    "work history",
    "career history",
    "relevant experience",
];

pub static EDUCATION_HEADERS: &[&str] = &[
    "education",
    "academic background",
    "educational qualifications",
    "academics",
    "qualifications",
    "education and training",
];

pub static SKILLS_HEADERS: &[&str] = &[
    "skills",
    "technical skills",
    "core competencies",
    "technologies",
    "skills & abilities",
    "key skills",
];

pub static CERTIFICATION_HEADERS: &[&str] = &[
    "certifications",
    "certificates",
    "licenses",
    "licenses & certifications",
    "licenses and certifications",
];

pub static PROJECT_HEADERS: &[&str] = &[
    "projects",
    "personal projects",
    "academic projects",
    "selected projects",
    "key projects",
];

pub static LANGUAGE_HEADERS: &[&str] = &["languages", "language proficiency", "language skills"];

pub static ACHIEVEMENT_HEADERS: &[&str] = &[
    "achievements",
    "awards",
    "honors",
    "honours",
    "awards & honors",
    "awards and honors",
    "accomplishments",
    "publications",
];

/// Keywords marking a line as an institution name. Short proper names
/// are matched as whole words; the generic terms as substrings.
pub static INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "polytechnic",
];

pub static INSTITUTION_NAMES: &[&str] = &["iit", "mit", "stanford", "harvard"];

/// Suffix words that make a line read as a company name.
pub static COMPANY_KEYWORDS: &[&str] = &[
    "inc",
    "inc.",
    "ltd",
    "ltd.",
    "llc",
    "corp",
    "corp.",
    "corporation",
    "company",
    "co.",
    "technologies",
    "systems",
    "solutions",
    "labs",
    "group",
    "consulting",
    "software",
    "gmbh",
];

/// Words that make a line read as a job title.
pub static TITLE_KEYWORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "consultant",
    "designer",
    "architect",
    "scientist",
    "lead",
    "director",
    "intern",
    "administrator",
    "specialist",
    "officer",
    "head",
    "coordinator",
    "researcher",
    "vp",
    "president",
    "founder",
];

/// Tokens that disqualify a `City, Region` candidate as a location.
pub static LOCATION_FORBIDDEN: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "consultant",
    "designer",
    "architect",
    "scientist",
    "director",
    "intern",
    "python",
    "java",
    "javascript",
    "react",
    "senior",
    "junior",
    "staff",
    "principal",
    "resume",
    "curriculum",
    "experience",
    "education",
    "skills",
    "summary",
    "objective",
    "inc",
    "ltd",
    "llc",
];

/// Well-known certification name patterns (case-insensitive regexes).
pub static CERTIFICATION_PATTERNS: &[&str] = &[
    r"AWS\s+Certified\s+[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"Microsoft\s+Certified[:\s]+[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"Azure\s+[A-Za-z][A-Za-z \-]*?(?:Associate|Expert|Fundamentals|Administrator|Architect)",
    r"Google\s+Cloud\s+(?:Certified\s+)?(?:Professional\s+|Associate\s+)?[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"Google\s+(?:Professional|Associate)\s+[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"\bCCNA\b|\bCCNP\b|\bCCIE\b",
    r"CompTIA\s+[A-Za-z+]+",
    r"\bPMP\b|Project\s+Management\s+Professional",
    r"\bPRINCE2\b",
    r"Certified\s+Scrum\s?Master|\bCSM\b",
    r"Certified\s+Kubernetes\s+(?:Administrator|Application\s+Developer)|\bCKA\b|\bCKAD\b",
    r"Oracle\s+Certified\s+[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"Red\s+Hat\s+Certified\s+[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"Certified\s+Ethical\s+Hacker|\bCEH\b",
    r"\bCISSP\b|\bCISA\b|\bCISM\b",
    r"Salesforce\s+Certified\s+[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"Databricks\s+Certified\s+[A-Za-z][A-Za-z \-]*[A-Za-z]",
    r"Tableau\s+(?:Desktop\s+)?(?:Certified|Specialist)[A-Za-z \-]*",
];

/// Issuer lookup by lowercase keyword contained in the certification name.
pub static CERTIFICATION_ISSUERS: &[(&str, &str)] = &[
    ("aws", "Amazon Web Services"),
    ("azure", "Microsoft"),
    ("microsoft", "Microsoft"),
    ("google", "Google Cloud"),
    ("ccna", "Cisco"),
    ("ccnp", "Cisco"),
    ("ccie", "Cisco"),
    ("cisco", "Cisco"),
    ("comptia", "CompTIA"),
    ("pmp", "Project Management Institute"),
    ("project management professional", "Project Management Institute"),
    ("prince2", "AXELOS"),
    ("scrum", "Scrum Alliance"),
    ("csm", "Scrum Alliance"),
    ("kubernetes", "Cloud Native Computing Foundation"),
    ("cka", "Cloud Native Computing Foundation"),
    ("ckad", "Cloud Native Computing Foundation"),
    ("oracle", "Oracle"),
    ("red hat", "Red Hat"),
    ("ceh", "EC-Council"),
    ("cissp", "ISC2"),
    ("cisa", "ISACA"),
    ("cism", "ISACA"),
    ("salesforce", "Salesforce"),
    ("databricks", "Databricks"),
    ("tableau", "Tableau"),
];

/// Names accepted as spoken languages.
pub static KNOWN_LANGUAGES: &[&str] = &[
    "english", "spanish", "french", "german", "chinese", "mandarin", "cantonese", "japanese",
    "korean", "hindi", "arabic", "portuguese", "russian", "italian", "dutch", "turkish",
    "polish", "swedish", "norwegian", "danish", "finnish", "greek", "hebrew", "thai",
    "vietnamese", "indonesian", "malay", "tamil", "telugu", "urdu", "bengali", "punjabi",
    "gujarati", "marathi", "ukrainian", "czech", "romanian", "hungarian", "tagalog",
    "swahili", "farsi", "persian",
];

/// Lines elsewhere in the document containing one of these count as
/// achievements.
pub static AWARD_KEYWORDS: &[&str] = &[
    "award",
    "awarded",
    "honor",
    "honour",
    "prize",
    "winner",
    "recognition",
    "recognized",
    "published",
    "patent",
    "scholarship",
    "dean's list",
    "medal",
    "fellowship",
];
